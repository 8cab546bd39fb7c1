//! Canned assistant responses and the agent catalog.
//!
//! [`CannedResponder`] stands in for a model backend. It picks one of a few
//! fixed responses by keyword so the rendering pipeline can be exercised end
//! to end with flowcharts, sequence diagrams and code in several languages.

use log::debug;
use serde::Serialize;

const FLOWCHART: &str = r#"Here's a flowchart diagram showing a typical user authentication process:

```mermaid
flowchart TD
    A[User Login Request] --> B{Valid Credentials?}
    B -->|Yes| C[Generate JWT Token]
    B -->|No| D[Show Error Message]
    C --> E[Set Session Cookie]
    E --> F[Redirect to Dashboard]
    D --> G[Return to Login Page]
    F --> H[Access Protected Resources]
    G --> A
```

This flowchart illustrates the complete authentication flow from initial login attempt to accessing protected resources."#;

const SEQUENCE: &str = r#"Here's a sequence diagram showing API communication flow:

```mermaid
sequenceDiagram
    participant Client
    participant API Gateway
    participant Auth Service
    participant Database
    participant Cache

    Client->>API Gateway: POST /api/login
    API Gateway->>Auth Service: Validate credentials
    Auth Service->>Database: Query user data
    Database-->>Auth Service: User record
    Auth Service->>Cache: Store session
    Cache-->>Auth Service: Session stored
    Auth Service-->>API Gateway: JWT token
    API Gateway-->>Client: Login successful

    Note over Client,Cache: User now authenticated

    Client->>API Gateway: GET /api/profile
    API Gateway->>Auth Service: Verify token
    Auth Service->>Cache: Check session
    Cache-->>Auth Service: Session valid
    Auth Service-->>API Gateway: Token valid
    API Gateway-->>Client: Profile data
```

This sequence diagram demonstrates the interaction between different services during user authentication and subsequent API calls."#;

const DATABASE: &str = r#"Here's a database schema diagram for an e-commerce system:

```mermaid
erDiagram
    CUSTOMER {
        int customer_id PK
        string email UK
        string first_name
        string last_name
    }

    ORDER {
        int order_id PK
        int customer_id FK
        decimal total_amount
        string status
    }

    PRODUCT {
        int product_id PK
        string name
        decimal price
    }

    ORDER_ITEM {
        int order_item_id PK
        int order_id FK
        int product_id FK
        int quantity
    }

    CUSTOMER ||--o{ ORDER : places
    ORDER ||--o{ ORDER_ITEM : contains
    PRODUCT ||--o{ ORDER_ITEM : "included in"
```

This entity relationship diagram shows the core structure of an e-commerce database with customers, orders, products, and order items."#;

const REACT: &str = r#"Here's a React component with hooks and state management:

```jsx
import React, { useState, useEffect } from 'react';

const UserProfileManager = () => {
  const [user, setUser] = useState(null);
  const [loading, setLoading] = useState(false);

  useEffect(() => {
    const fetchUserData = async () => {
      setLoading(true);
      try {
        const response = await fetch('/api/user/profile');
        setUser(await response.json());
      } catch (error) {
        console.error('Failed to fetch user data:', error);
      } finally {
        setLoading(false);
      }
    };
    fetchUserData();
  }, []);

  if (loading) {
    return <div className="spinner" />;
  }

  return (
    <section>
      <h2>{user ? user.firstName : 'Guest'}</h2>
    </section>
  );
};

export default UserProfileManager;
```

This component loads the user profile on mount and shows a spinner while the request is in flight."#;

const PYTHON: &str = r#"Here's a Python class for handling user authentication with JWT tokens:

```python
import datetime
from typing import Any, Dict, Optional

import bcrypt
import jwt


class AuthenticationService:
    def __init__(self, secret_key: str, algorithm: str = "HS256"):
        self.secret_key = secret_key
        self.algorithm = algorithm
        self.token_expiry_hours = 24

    def hash_password(self, password: str) -> str:
        """Hash a password using bcrypt"""
        salt = bcrypt.gensalt()
        return bcrypt.hashpw(password.encode("utf-8"), salt).decode("utf-8")

    def generate_token(self, user_id: int, email: str) -> str:
        """Generate JWT token for authenticated user"""
        payload = {
            "user_id": user_id,
            "email": email,
            "exp": datetime.datetime.utcnow()
            + datetime.timedelta(hours=self.token_expiry_hours),
        }
        return jwt.encode(payload, self.secret_key, algorithm=self.algorithm)

    def verify_token(self, token: str) -> Optional[Dict[str, Any]]:
        """Verify and decode JWT token"""
        try:
            return jwt.decode(token, self.secret_key, algorithms=[self.algorithm])
        except jwt.InvalidTokenError:
            return None
```

This Python authentication service provides password hashing, token generation and token verification."#;

const NODE: &str = r#"Here's a Node.js Express API with middleware and error handling:

```javascript
const express = require('express');
const cors = require('cors');

const app = express();
const PORT = process.env.PORT || 3000;

app.use(cors());
app.use(express.json({ limit: '10mb' }));

app.get('/api/users', async (req, res, next) => {
  try {
    const page = parseInt(req.query.page, 10) || 1;
    const users = await findUsers({ page, limit: 10 });
    res.json({ success: true, data: users });
  } catch (error) {
    next(error);
  }
});

app.use((err, req, res, next) => {
  console.error(err.stack);
  res.status(500).json({ success: false, message: 'Internal server error' });
});

app.listen(PORT, () => {
  console.log(`Server running on port ${PORT}`);
});
```

This Express.js API includes middleware setup, pagination, and error handling with proper HTTP status codes."#;

const ARCHITECTURE: &str = r#"I can help you create various types of diagrams. Here's a simple system architecture diagram:

```mermaid
graph TB
    A[Frontend App] --> B[API Gateway]
    B --> C[Authentication Service]
    B --> D[User Service]
    B --> E[Order Service]
    C --> F[(Auth Database)]
    D --> G[(User Database)]
    E --> H[(Order Database)]

    I[Load Balancer] --> A
    J[CDN] --> A

    style A fill:#e1f5fe
    style B fill:#f3e5f5
```

This diagram shows a typical microservices architecture with separate services for different business domains."#;

const TYPESCRIPT: &str = r#"Here's a utility class for handling API responses with TypeScript:

```typescript
interface ApiResponse<T = unknown> {
  success: boolean;
  data?: T;
  message?: string;
}

class ApiClient {
  constructor(private baseURL: string) {}

  async get<T>(endpoint: string): Promise<ApiResponse<T>> {
    const response = await fetch(`${this.baseURL}${endpoint}`);
    if (!response.ok) {
      throw new Error(`HTTP error! status: ${response.status}`);
    }
    return response.json();
  }
}

const api = new ApiClient('https://api.example.com');
```

This TypeScript API client provides a typed interface for making HTTP requests with error handling."#;

/// Keyword rules checked in order; the first rule with a matching keyword
/// wins.
const RULES: &[(&[&str], &str)] = &[
    (&["flowchart", "flow chart", "process flow"], FLOWCHART),
    (&["sequence", "api flow", "communication"], SEQUENCE),
    (&["database", "schema", "er diagram", "entity"], DATABASE),
    (&["react", "component", "jsx"], REACT),
    (&["python", "authentication", "jwt"], PYTHON),
    (&["node", "express", "api", "backend"], NODE),
    (&["diagram"], ARCHITECTURE),
    (&["code"], TYPESCRIPT),
];

/// Picks a fixed response for a prompt.
#[derive(Debug, Clone, Copy, Default)]
pub struct CannedResponder;

impl CannedResponder {
    pub fn new() -> Self {
        Self
    }

    /// Return the response for `prompt`.
    ///
    /// Keywords are matched case-insensitively. A prompt matching no rule
    /// gets a help message that quotes it and lists example prompts.
    pub fn respond(&self, prompt: &str) -> String {
        let input = prompt.to_lowercase();
        let matched = RULES
            .iter()
            .position(|(keywords, _)| keywords.iter().any(|keyword| input.contains(keyword)));

        match matched {
            Some(rule) => {
                debug!(rule; "Canned response selected");
                RULES[rule].1.to_string()
            }
            None => {
                debug!("No canned response matched, sending help");
                help_message(prompt)
            }
        }
    }
}

fn help_message(prompt: &str) -> String {
    format!(
        "I understand your query: \"{prompt}\". I can help you with various tasks including:

**For diagrams, try asking:**
- \"show me a flowchart for user authentication\"
- \"create a sequence diagram for API communication\"
- \"generate a database schema diagram\"

**For code examples:**
- \"show me React component code\"
- \"write Python authentication code\"
- \"create Node.js API endpoints\"

What would you like me to help you with?"
    )
}

/// An entry of the agent library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Agent {
    id: &'static str,
    title: &'static str,
    icon: &'static str,
    description: &'static str,
    available: bool,
}

impl Agent {
    const fn new(
        id: &'static str,
        title: &'static str,
        icon: &'static str,
        description: &'static str,
        available: bool,
    ) -> Self {
        Self {
            id,
            title,
            icon,
            description,
            available,
        }
    }

    pub fn id(&self) -> &'static str {
        self.id
    }

    pub fn title(&self) -> &'static str {
        self.title
    }

    pub fn icon(&self) -> &'static str {
        self.icon
    }

    pub fn description(&self) -> &'static str {
        self.description
    }

    /// Whether the agent can be opened, as opposed to "coming soon".
    pub fn is_available(&self) -> bool {
        self.available
    }
}

const AGENTS: &[Agent] = &[
    Agent::new(
        "scrum-po-ba",
        "Scrum PO and BA Agent",
        "📋",
        "Generate improved specifications and user stories with Product Owner and Business Analyst agents.",
        true,
    ),
    Agent::new(
        "chat-assistant",
        "Chat Assistant",
        "💬",
        "AI-powered conversational assistance with multi-agent orchestration capabilities.",
        true,
    ),
    Agent::new(
        "qa-tester",
        "QA Tester Agent",
        "🧪",
        "Generate test cases, perform quality assurance, and provide testing documentation.",
        true,
    ),
    Agent::new(
        "general-web-research",
        "General web research",
        "📄",
        "Conduct tailored web research using agents",
        false,
    ),
    Agent::new(
        "recaps-builder",
        "Recaps builder",
        "🎙️",
        "Create comprehensive meeting recaps and summaries",
        false,
    ),
    Agent::new(
        "chart-analysis",
        "Chart analysis",
        "📊",
        "Analyze and interpret various chart types and data",
        false,
    ),
    Agent::new(
        "meeting-notes",
        "Meeting notes summary & action items",
        "📝",
        "Extract key points and action items from meetings",
        false,
    ),
    Agent::new(
        "image-analysis",
        "Image analysis",
        "🖼️",
        "Analyze and describe images with AI insights",
        false,
    ),
    Agent::new(
        "handwritten-documents",
        "Handwritten documents to text",
        "✍️",
        "Convert handwritten notes to digital text",
        false,
    ),
    Agent::new(
        "ask-writer",
        "Ask WRITER",
        "✨",
        "Get help with writing tasks and content creation",
        false,
    ),
    Agent::new(
        "blog-builder",
        "Blog builder",
        "📰",
        "Create engaging blog posts and articles",
        false,
    ),
    Agent::new(
        "call-transcript",
        "Call transcript summary",
        "📞",
        "Summarize and analyze call transcripts",
        false,
    ),
    Agent::new(
        "easy-summary",
        "Easy summary",
        "⚡",
        "Quickly summarize any content or document",
        false,
    ),
];

/// Every agent in the library, in display order.
pub fn agents() -> &'static [Agent] {
    AGENTS
}

pub fn find_agent(id: &str) -> Option<&'static Agent> {
    AGENTS.iter().find(|agent| agent.id == id)
}

/// Agents whose title or description contains `term`, ignoring case.
///
/// An empty term matches every agent.
pub fn search_agents(term: &str) -> Vec<&'static Agent> {
    let term = term.to_lowercase();
    AGENTS
        .iter()
        .filter(|agent| {
            agent.title.to_lowercase().contains(&term)
                || agent.description.to_lowercase().contains(&term)
        })
        .collect()
}
