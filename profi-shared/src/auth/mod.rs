/// Authentication primitives
///
/// ProFi has no session or token model: the presentation layer is trusted to
/// supply the authenticated username on every call. The only credential
/// machinery is password hashing.
///
/// # Modules
///
/// - [`password`]: Argon2id hashing and constant-time verification

pub mod password;
