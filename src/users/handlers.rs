use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, patch, post},
    Json, Router,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument, warn};

use super::{
    dto::{
        AuthResponse, ChangePasswordRequest, LoginRequest, PublicUser, RegisterRequest,
        UpdateProfileRequest,
    },
    repo_types::{NewUser, User},
    store::StoreError,
    validation::{
        bio_fits, is_valid_email, normalize_email, password_long_enough, present, present_secret,
    },
};
use crate::{
    auth::{
        cookie::{cleared_cookie, read_token, session_cookie},
        extractors::AuthUser,
        password,
    },
    error::{ApiError, MessageBody},
    state::AppState,
};

const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters";

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", get(logout).post(logout))
        .route("/getuser", get(get_user))
        .route("/loggedin", get(login_status))
        .route("/updateuser", patch(update_user))
        .route("/changepassword", patch(change_password))
        .route("/forgotpassword", post(forgot_password))
}

#[instrument(skip(state, jar, payload))]
pub async fn register(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, CookieJar, Json<AuthResponse>), ApiError> {
    let Json(payload) = payload?;

    let (Some(name), Some(email), Some(plain)) = (
        present(payload.name),
        present(payload.email),
        present_secret(payload.password),
    ) else {
        warn!("register with missing fields");
        return Err(ApiError::bad_request("Please fill in all required fields"));
    };

    let email = normalize_email(&email);
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::bad_request("Please enter a valid email"));
    }

    if !password_long_enough(&plain) {
        warn!("password too short");
        return Err(ApiError::bad_request(PASSWORD_TOO_SHORT));
    }

    // The store also rejects a duplicate that races past this check.
    if state.users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(StoreError::DuplicateEmail(email).into());
    }

    let digest = password::hash_in_background(plain).await?;
    let user = state.users.create(NewUser::new(name, email, digest)).await?;

    let (jar, body) = start_session(&state, jar, &user)?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((StatusCode::CREATED, jar, body))
}

#[instrument(skip(state, jar, payload))]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let Json(payload) = payload?;

    let (Some(email), Some(plain)) = (present(payload.email), present_secret(payload.password))
    else {
        return Err(ApiError::bad_request("Please add email and password"));
    };
    let email = normalize_email(&email);

    // Existence first: no digest comparison against a missing record.
    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(ApiError::bad_request("User not registered"));
    };

    if !password::verify_in_background(plain, user.password.clone()).await? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::bad_request("Invalid email or password"));
    }

    let (jar, body) = start_session(&state, jar, &user)?;
    info!(user_id = %user.id, "user logged in");
    Ok((jar, body))
}

/// Clears the cookie only; an already issued token stays valid until it expires.
#[instrument(skip(jar))]
pub async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageBody>) {
    info!("user logged out");
    (
        jar.add(cleared_cookie()),
        Json(MessageBody {
            message: "Successfully Logged Out".into(),
        }),
    )
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<PublicUser>, ApiError> {
    let user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(PublicUser::from(&user)))
}

#[instrument(skip(state, jar))]
pub async fn login_status(State(state): State<AppState>, jar: CookieJar) -> Json<bool> {
    let Some(token) = read_token(&jar) else {
        return Json(false);
    };
    Json(state.jwt.verify(&token).is_ok())
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<UpdateProfileRequest>, JsonRejection>,
) -> Result<Json<PublicUser>, ApiError> {
    let Json(payload) = payload?;

    let mut user = state
        .users
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    if let Some(name) = present(payload.name) {
        user.name = name;
    }
    if let Some(photo) = present(payload.photo) {
        user.photo = photo;
    }
    if let Some(phone) = present(payload.phone) {
        user.phone = phone;
    }
    if let Some(bio) = present(payload.bio) {
        if !bio_fits(&bio) {
            return Err(ApiError::bad_request(
                "Bio must not be more than 250 characters",
            ));
        }
        user.bio = bio;
    }

    let user = state.users.save(&user).await?;
    info!(user_id = %user.id, "profile updated");
    Ok(Json(PublicUser::from(&user)))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<ChangePasswordRequest>, JsonRejection>,
) -> Result<(StatusCode, &'static str), ApiError> {
    let Some(mut user) = state.users.find_by_id(user_id).await? else {
        return Err(ApiError::not_found("User not found, please signup"));
    };
    let Json(payload) = payload?;

    let (Some(old_plain), Some(new_plain)) = (
        present_secret(payload.old_password),
        present_secret(payload.password),
    ) else {
        return Err(ApiError::bad_request("Please add old and new Password"));
    };

    if !password_long_enough(&new_plain) {
        return Err(ApiError::bad_request(PASSWORD_TOO_SHORT));
    }

    if !password::verify_in_background(old_plain, user.password.clone()).await? {
        warn!(user_id = %user.id, "change password with wrong old password");
        return Err(ApiError::bad_request("Old Password is incorrect"));
    }

    user.password = password::hash_in_background(new_plain).await?;
    state.users.save(&user).await?;

    info!(user_id = %user.id, "password changed");
    Ok((StatusCode::OK, "Password changed successfully"))
}

/// Placeholder until a reset-token flow exists.
pub async fn forgot_password() -> &'static str {
    "Forgot Password"
}

fn start_session(
    state: &AppState,
    jar: CookieJar,
    user: &User,
) -> Result<(CookieJar, Json<AuthResponse>), ApiError> {
    let token = state.jwt.issue(user.id)?;
    let jar = jar.add(session_cookie(token.clone(), state.jwt.ttl()));
    Ok((
        jar,
        Json(AuthResponse {
            user: PublicUser::from(user),
            token,
        }),
    ))
}
