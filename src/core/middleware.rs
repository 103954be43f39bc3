//! Middleware identifiers.
//!
//! Panels and resources refer to middleware by these names; the HTTP layer
//! maps each name to a tower layer.

/// Log each request and response.
pub const TRACE_REQUESTS: &str = "trace_requests";

/// Permissive CORS headers.
pub const CORS: &str = "cors";

/// Read the requesting user from the `x-panel-user` header.
pub const IDENTIFY_USER: &str = "identify_user";

/// Mark the request as served by a panel.
pub const DISPATCH_SERVING_PANEL: &str = "dispatch_serving_panel";

/// Reject requests without an identified user.
pub const AUTHENTICATE: &str = "authenticate";

/// Header carrying the requesting user's id.
pub const USER_HEADER: &str = "x-panel-user";
