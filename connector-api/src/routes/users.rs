/// User registration endpoint
///
/// # Endpoints
///
/// - `POST /api/users` - Register a new user (public)

use crate::{
    app::AppState,
    error::{ApiError, ApiResult, ErrorDetail},
};
use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use connector_shared::{
    auth::{
        jwt::{self, Claims},
        password,
    },
    avatar,
    models::user::CreateUser,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::{Validate, ValidationErrors};

/// Order in which field errors are reported
const FIELD_ORDER: [&str; 3] = ["name", "email", "password"];

/// Register request
///
/// Fields are optional at the type level so that a missing or `null` field
/// is reported as a validation error rather than a deserialization failure.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name
    #[validate(
        required(message = "Name is required"),
        length(min = 1, message = "Name is required")
    )]
    pub name: Option<String>,

    /// Email address
    #[validate(
        required(message = "Please include a valid email address"),
        email(message = "Please include a valid email address")
    )]
    pub email: Option<String>,

    /// Plaintext password, hashed before storage
    #[validate(
        required(message = "Please enter a password with at least 6 characters"),
        length(min = 6, message = "Please enter a password with at least 6 characters")
    )]
    pub password: Option<String>,
}

/// Register response
#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    /// Signed JWT whose subject is the new user's ID
    pub token: String,
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut details: Vec<(usize, ErrorDetail)> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errors)| {
                let field = field.to_string();
                let position = FIELD_ORDER
                    .iter()
                    .position(|name| *name == field)
                    .unwrap_or(FIELD_ORDER.len());

                errors.iter().map(move |error| {
                    let msg = error
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| "Invalid value".to_string());
                    (position, ErrorDetail::body_field(field.clone(), msg))
                })
            })
            .collect();

        details.sort_by_key(|(position, _)| *position);
        ApiError::Validation(details.into_iter().map(|(_, detail)| detail).collect())
    }
}

/// Register a new user
///
/// # Endpoint
///
/// ```text
/// POST /api/users
/// Content-Type: application/json
///
/// {
///   "name": "Ada",
///   "email": "ada@example.com",
///   "password": "secret1"
/// }
/// ```
///
/// # Response
///
/// `201 Created`
///
/// ```json
/// { "token": "eyJ..." }
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: Validation failed, malformed body, or user already exists
/// - `500 Internal Server Error`: Storage, hashing or signing failed
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<RegisterResponse>)> {
    let Json(req) = payload?;
    req.validate()?;

    let RegisterRequest {
        name: Some(name),
        email: Some(email),
        password: Some(password),
    } = req
    else {
        return Err(ApiError::Internal(
            "Validated register request is missing a field".to_string(),
        ));
    };

    // Fast path; the insert below is what actually guarantees uniqueness
    if state.store.find_by_email(&email).await?.is_some() {
        debug!("Registration rejected: email already registered");
        return Err(ApiError::UserExists);
    }

    let avatar = avatar::gravatar_url(&email, &state.avatar);
    let password_hash = password::hash_password_blocking(password).await?;

    let user = state
        .store
        .create(CreateUser {
            name,
            email,
            password_hash,
            avatar,
        })
        .await?;

    let claims = Claims::new(user.id, state.token_lifetime())?;
    let token = jwt::create_token(&claims, state.jwt_secret())?;

    info!(user_id = %user.id, "User registered");

    Ok((StatusCode::CREATED, Json(RegisterResponse { token })))
}
