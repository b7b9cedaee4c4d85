/// Authentication pages
///
/// # Endpoints
///
/// - `GET /login/` - Login form
/// - `POST /login/` - Check credentials and start a session
/// - `GET /register/` - Registration form
/// - `POST /register/` - Create an account and start a session
/// - `POST /logout/` - End the session everywhere
///
/// Visitors who already have a valid session are sent to the task list from
/// the login and registration pages.

use crate::{
    app::AppState,
    error::{AppResult, LOGIN_URL},
    forms::{FormErrors, LoginForm, RegisterForm, DUPLICATE_USERNAME, INVALID_LOGIN},
    routes::with_cookie,
    views,
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use tasklist_shared::{
    auth::{
        jwt::{create_token, Claims},
        middleware::{authenticate, AuthContext, AuthError},
        password,
        session::{clear_session_cookie, session_cookie},
    },
    models::user::{is_unique_violation, CreateUser, User},
};

/// Where users land after logging in
pub const HOME_URL: &str = "/";

/// Resolves the session on a public page, if there is a valid one
async fn current_user(state: &AppState, headers: &HeaderMap) -> AppResult<Option<AuthContext>> {
    match authenticate(&state.db, headers, state.session_secret()).await {
        Ok(auth) => Ok(Some(auth)),
        Err(AuthError::DatabaseError(e)) => Err(e.into()),
        Err(_) => Ok(None),
    }
}

/// Issues a session token for `user` and redirects to the task list
fn start_session(state: &AppState, user: &User) -> AppResult<Response> {
    let ttl = state.session_ttl();
    let token = create_token(
        &Claims::new(user.id, user.session_epoch, ttl),
        state.session_secret(),
    )?;
    let cookie = session_cookie(&token, ttl, state.secure_cookies());

    Ok(with_cookie(Redirect::to(HOME_URL).into_response(), &cookie))
}

fn login_form_response(username: &str, errors: &FormErrors) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Html(views::auth::login_page(username, errors)),
    )
        .into_response()
}

fn register_form_response(username: &str, errors: &FormErrors) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Html(views::auth::register_page(username, errors)),
    )
        .into_response()
}

/// Login form
pub async fn login_page(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    if current_user(&state, &headers).await?.is_some() {
        return Ok(Redirect::to(HOME_URL).into_response());
    }

    Ok(Html(views::auth::login_page("", &FormErrors::new())).into_response())
}

/// Login
///
/// Wrong username and wrong password produce the same message.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: missing fields or bad credentials (form redisplayed)
/// - `500 Internal Server Error`: database or hashing failure
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<LoginForm>,
) -> AppResult<Response> {
    if current_user(&state, &headers).await?.is_some() {
        return Ok(Redirect::to(HOME_URL).into_response());
    }

    let form = form.normalized();
    if let Err(errors) = form.validate() {
        return Ok(login_form_response(&form.username, &errors));
    }

    let user = User::find_by_username(&state.db, &form.username).await?;

    let authenticated = match &user {
        Some(user) => password::verify_password(&form.password, &user.password_hash)?,
        None => {
            // Same hashing cost whether or not the username exists
            password::hash_password(&form.password)?;
            false
        }
    };

    let user = match user {
        Some(user) if authenticated => user,
        _ => {
            tracing::info!(username = %form.username, "Failed login attempt");
            let mut errors = FormErrors::new();
            errors.add_non_field(INVALID_LOGIN);
            return Ok(login_form_response(&form.username, &errors));
        }
    };

    User::update_last_login(&state.db, user.id).await?;
    tracing::info!(user_id = %user.id, username = %user.username, "User logged in");

    start_session(&state, &user)
}

/// Registration form
pub async fn register_page(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> AppResult<Response> {
    if current_user(&state, &headers).await?.is_some() {
        return Ok(Redirect::to(HOME_URL).into_response());
    }

    Ok(Html(views::auth::register_page("", &FormErrors::new())).into_response())
}

/// Registration
///
/// On success the new user is logged in straight away.
///
/// # Errors
///
/// - `422 Unprocessable Entity`: any field invalid or username taken (form redisplayed)
/// - `500 Internal Server Error`: database or hashing failure
pub async fn register(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<RegisterForm>,
) -> AppResult<Response> {
    if current_user(&state, &headers).await?.is_some() {
        return Ok(Redirect::to(HOME_URL).into_response());
    }

    let form = form.normalized();
    let mut errors = match form.validate() {
        Ok(()) => FormErrors::new(),
        Err(errors) => errors,
    };

    // Only an otherwise valid username is looked up
    if !errors.has_field("username") && User::username_exists(&state.db, &form.username).await? {
        errors.add("username", DUPLICATE_USERNAME);
    }

    if !errors.is_empty() {
        return Ok(register_form_response(&form.username, &errors));
    }

    let password_hash = password::hash_password(&form.password)?;

    let user = match User::create(
        &state.db,
        CreateUser {
            username: form.username.clone(),
            password_hash,
        },
    )
    .await
    {
        Ok(user) => user,
        Err(e) if is_unique_violation(&e) => {
            let mut errors = FormErrors::new();
            errors.add("username", DUPLICATE_USERNAME);
            return Ok(register_form_response(&form.username, &errors));
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = %user.id, username = %user.username, "User registered");

    start_session(&state, &user)
}

/// Logout
///
/// Revokes every session token issued to the user so far, clears the
/// session cookie and sends the user to the login page.
///
/// # Errors
///
/// - `500 Internal Server Error`: database failure (the session stays valid)
pub async fn logout(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
) -> AppResult<Response> {
    User::revoke_sessions(&state.db, auth.user_id).await?;
    tracing::info!(user_id = %auth.user_id, "User logged out");

    Ok(with_cookie(
        Redirect::to(LOGIN_URL).into_response(),
        &clear_session_cookie(state.secure_cookies()),
    ))
}
