use crate::api::attendance::{SubmitRequest, SubmitResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Driver Tracker API",
        version = "1.0.0",
        description = r#"
## Driver Tracker

Records driver attendance and site visits straight into the team's
Google Sheets workbook.

### 🔹 Key Features
- **Attendance**
  - Check-in / check-out submissions, classified on time vs late against the 09:15 cutoff
- **Site Visits**
  - Off-site visit log appended to its own sheet tab

### 📦 Response Format
- Uniform `{success, error?}` JSON envelope; a failed submission never drops the request

---
Built with **Rust**, **Actix Web**, and **Utoipa**.
"#,
    ),
    paths(crate::api::attendance::submit),
    components(schemas(SubmitRequest, SubmitResponse)),
    tags(
        (name = "Attendance", description = "Attendance and site-visit submission APIs"),
    )
)]
pub struct ApiDoc;
