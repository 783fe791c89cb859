use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims carried by a session token. The email is the durable key
/// for reservation ownership; the id is minted fresh at every login.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: Uuid,     // user ID
    pub name: String,  // display name
    pub email: String, // durable ownership key
    pub exp: usize,    // expiration time
    pub iat: usize,    // issued at
    pub iss: String,   // issuer
    pub aud: String,   // audience
}

/// Request body for login. Any plausible name/email pair is accepted.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// Response returned after login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub user: PublicUser,
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}
