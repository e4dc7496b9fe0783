// Authentication module
// Password hashing, bearer tokens, the token gate and the account flows

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

// Re-export commonly used types
pub use error::AuthError;
pub use handlers::{login_handler, profile_handler, register_handler, root_handler};
pub use middleware::AuthenticatedUser;
pub use models::{
    LoginRequest, LoginResponse, MessageResponse, ProfileResponse, ProfileUser, RegisterForm,
    RegisterResponse, RegisteredUser, User,
};
pub use repository::{UserRepository, UserStore};
pub use service::AccountService;
pub use token::{Claims, TokenService};
