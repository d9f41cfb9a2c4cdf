use crate::api::leave::{CreateLeave, DecideLeave};
use crate::model::leave_application::{LeaveApplication, LeaveStatus};
use crate::model::role::Role;
use crate::models::{LoginReqDto, RegisterReq, UserPublic};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Portal API",
        version = "1.0.0",
        description = r#"
## Leave-Request Management

This API powers a leave-request portal: users register as **student**,
**teacher** or **admin**, submit leave applications, and have them approved
or rejected under role-based rules.

### 🔹 Key Features
- **Accounts**
  - Register with a role, log in for a bearer token
- **Leave Applications**
  - Submit an application, view your own history
- **Approval Workflow**
  - Teachers review student applications; admins review any
  - A decision is final: Pending → Approved/Rejected happens at most once

### 🔐 Security
All `/api/leaves` endpoints require **JWT Bearer authentication**.
Teachers can only decide on student applications; admins can decide on any.

### 📦 Response Format
- JSON-based RESTful responses
- Failures carry a JSON body of the form `{"message": "..."}`

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::register,
        crate::auth::handlers::login,

        crate::api::leave::submit_leave,
        crate::api::leave::my_leaves,
        crate::api::leave::pending_leaves,
        crate::api::leave::get_leave,
        crate::api::leave::decide_leave,
    ),
    components(
        schemas(
            RegisterReq,
            LoginReqDto,
            UserPublic,
            Role,
            LeaveStatus,
            CreateLeave,
            DecideLeave,
            LeaveApplication
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration and login APIs"),
        (name = "Leave", description = "Leave application and approval APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
