//! Span names and field values shared by the backend clients.
//!
//! Request spans are named with the constants below and carry the fields
//! `assistdesk.backend`, `http.request.method`, `url.path` and, once the
//! response arrives, `http.response.status_code`.

// --- Span names ---

/// One HTTP round trip to a backend.
pub const SPAN_HTTP_REQUEST: &str = "assistdesk.http_request";

/// A write issued to two backends at once.
pub const SPAN_FAN_OUT: &str = "assistdesk.fan_out";

// --- `assistdesk.backend` values ---

/// General-purpose API (training data, files, feedback).
pub const BACKEND_GENERAL: &str = "general";

pub const BACKEND_PATENT: &str = "patent";

pub const BACKEND_PROCESS: &str = "process";
