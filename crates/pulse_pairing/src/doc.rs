use utoipa::OpenApi;

use crate::handlers::{
    CreateUserRequest, GenerateCodeRequest, GenerateCodeResponse, JoinRequest, JoinResponse,
    LoginRequest, ResetPasswordRequest, UserResponse,
};
use crate::models::{CodeStatus, CoupleView, PairingCode, PublicUser};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::create_user_handler,
        crate::handlers::login_handler,
        crate::handlers::reset_password_handler,
        crate::handlers::get_user_handler,
        crate::handlers::generate_code_handler,
        crate::handlers::join_handler,
        crate::handlers::current_code_handler,
        crate::handlers::get_couple_handler,
        crate::handlers::unpair_handler,
    ),
    components(
        schemas(
            CreateUserRequest,
            LoginRequest,
            ResetPasswordRequest,
            UserResponse,
            GenerateCodeRequest,
            GenerateCodeResponse,
            JoinRequest,
            JoinResponse,
            PublicUser,
            PairingCode,
            CodeStatus,
            CoupleView,
        )
    ),
    tags(
        (name = "Users", description = "Registration and login"),
        (name = "Pairing", description = "Pairing codes"),
        (name = "Couples", description = "Couple lookup and unpairing")
    )
)]
pub struct PairingApiDoc;
