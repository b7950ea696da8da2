pub const OK_JSON: &str = "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n";
pub const OK_TEXT: &str = "HTTP/1.1 200 OK\r\nContent-Type: text/plain; charset=utf-8\r\n";
pub const NO_CONTENT: &str = concat!(
    "HTTP/1.1 204 No Content\r\n",
    "Access-Control-Allow-Methods: GET, POST, OPTIONS\r\n",
    "Access-Control-Allow-Headers: Content-Type\r\n"
);
pub const BAD_REQUEST: &str = "HTTP/1.1 400 Bad Request\r\n";
pub const NOT_FOUND: &str = "HTTP/1.1 404 NOT FOUND\r\n";

/// Sent by the gateway so browsers treat the call as a simple request.
pub const REQUEST_CONTENT_TYPE: &str = "text/plain;charset=UTF-8";

pub const SHEET_HEADER: [&str; 3] = ["username", "password", "created_at"];

pub const LIVENESS_MESSAGE: &str = "API is running. Please use POST method.";

pub const REGISTER_SUCCESS: &str = "registration successful";
pub const ACCOUNT_EXISTS: &str = "account already exists";
pub const LOGIN_SUCCESS: &str = "login successful";
pub const INVALID_CREDENTIALS: &str = "invalid username or password";
pub const INVALID_OPERATION: &str = "invalid operation";
pub const SERVER_ERROR_PREFIX: &str = "server error: ";
pub const STORE_BUSY: &str = "server busy, please try again";

pub const MISSING_CREDENTIALS: &str = "please enter username and password";
pub const CONNECTION_FAILED: &str =
    "unable to reach the server, please check your network or try again later";
