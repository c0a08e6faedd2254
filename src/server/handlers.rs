//! Request handlers for the game API

use serde::Deserialize;
use tracing::{error, info};

use super::respond_json;
use crate::auth;
use crate::game::GameManager;
use crate::progression::ProgressionError;
use crate::store::{NewUser, ProfileUpdate, User, UserStoreError};

#[derive(Debug, Deserialize)]
struct RegisterRequest {
    name: String,
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: String,
    password: String,
}

#[derive(Debug, Deserialize)]
struct PasswordUpdateRequest {
    current_password: String,
    new_password: String,
}

#[derive(Debug, Deserialize)]
struct GrantXpRequest {
    amount: i64,
}

/// POST /api/register
pub fn handle_register(manager: &GameManager, body: &str, request: tiny_http::Request) {
    let req: RegisterRequest = match serde_json::from_str(body) {
        Ok(req) => req,
        Err(e) => {
            respond_json(
                request,
                400,
                serde_json::json!({ "error": "invalid_json", "details": e.to_string() }),
            );
            return;
        }
    };

    let name = req.name.trim();
    let email = req.email.trim().to_ascii_lowercase();
    if name.is_empty() || email.is_empty() || req.password.is_empty() {
        respond_json(request, 400, serde_json::json!({ "error": "missing_fields" }));
        return;
    }

    let new_user = NewUser {
        name: name.to_string(),
        email,
        password_hash: auth::hash_password(&req.password),
    };

    let user = match manager.users().create(&new_user) {
        Ok(user) => user,
        Err(e) if e.downcast_ref::<UserStoreError>().is_some() => {
            respond_json(request, 409, serde_json::json!({ "error": "email_taken" }));
            return;
        }
        Err(e) => {
            error!("[farmstead:http] Registration failed: {e}");
            respond_json(request, 500, serde_json::json!({ "error": "internal" }));
            return;
        }
    };

    let token = match manager.sessions().create(user.id) {
        Ok(token) => token,
        Err(e) => {
            error!("[farmstead:http] Session create failed: {e}");
            respond_json(request, 500, serde_json::json!({ "error": "internal" }));
            return;
        }
    };

    info!("[farmstead:http] Registered user {} ({})", user.id, user.email);
    respond_json(
        request,
        200,
        serde_json::json!({ "token": token, "user": { "id": user.id, "name": user.name, "email": user.email } }),
    );
}

/// POST /api/login
pub fn handle_login(manager: &GameManager, body: &str, request: tiny_http::Request) {
    let req: LoginRequest = match serde_json::from_str(body) {
        Ok(req) => req,
        Err(e) => {
            respond_json(
                request,
                400,
                serde_json::json!({ "error": "invalid_json", "details": e.to_string() }),
            );
            return;
        }
    };

    let email = req.email.trim().to_ascii_lowercase();
    let user = match manager.users().find_by_email(&email) {
        Ok(Some(user)) if auth::verify_password(&req.password, &user.password_hash) => user,
        Ok(_) => {
            // Same response for unknown email and wrong password
            respond_json(request, 401, serde_json::json!({ "error": "invalid_credentials" }));
            return;
        }
        Err(e) => {
            error!("[farmstead:http] Login lookup failed: {e}");
            respond_json(request, 500, serde_json::json!({ "error": "internal" }));
            return;
        }
    };

    let token = match manager.sessions().create(user.id) {
        Ok(token) => token,
        Err(e) => {
            error!("[farmstead:http] Session create failed: {e}");
            respond_json(request, 500, serde_json::json!({ "error": "internal" }));
            return;
        }
    };

    respond_json(
        request,
        200,
        serde_json::json!({ "token": token, "user": { "id": user.id, "name": user.name, "email": user.email } }),
    );
}

/// POST /api/logout
pub fn handle_logout(manager: &GameManager, token: &str, request: tiny_http::Request) {
    match manager.sessions().delete(token) {
        Ok(true) => respond_json(request, 200, serde_json::json!({ "status": "ok" })),
        Ok(false) => respond_json(request, 401, serde_json::json!({ "error": "unauthorized" })),
        Err(e) => {
            error!("[farmstead:http] Logout failed: {e}");
            respond_json(request, 500, serde_json::json!({ "error": "internal" }));
        }
    }
}

/// GET /api/dashboard
pub fn handle_dashboard(manager: &GameManager, user: &User, request: tiny_http::Request) {
    match manager.dashboard(user) {
        Ok(view) => match serde_json::to_value(&view) {
            Ok(json) => respond_json(request, 200, json),
            Err(e) => {
                error!("[farmstead:http] Dashboard serialize failed: {e}");
                respond_json(request, 500, serde_json::json!({ "error": "internal" }));
            }
        },
        Err(e) => {
            error!("[farmstead:http] Dashboard assembly failed: {e}");
            respond_json(request, 500, serde_json::json!({ "error": "internal" }));
        }
    }
}

/// GET /api/profile
pub fn handle_profile_get(manager: &GameManager, user: &User, request: tiny_http::Request) {
    let progress = manager.progress().get(user.id).ok().flatten();
    respond_json(
        request,
        200,
        serde_json::json!({
            "user": user,
            "progress": progress,
        }),
    );
}

/// PUT /api/profile
pub fn handle_profile_update(
    manager: &GameManager,
    user: &User,
    body: &str,
    request: tiny_http::Request,
) {
    let update: ProfileUpdate = match serde_json::from_str(body) {
        Ok(update) => update,
        Err(e) => {
            respond_json(
                request,
                400,
                serde_json::json!({ "error": "invalid_json", "details": e.to_string() }),
            );
            return;
        }
    };

    match manager.users().update_profile(user.id, &update) {
        Ok(Some(updated)) => respond_json(request, 200, serde_json::json!({ "user": updated })),
        Ok(None) => respond_json(request, 404, serde_json::json!({ "error": "not_found" })),
        Err(e) if e.downcast_ref::<UserStoreError>().is_some() => {
            respond_json(request, 409, serde_json::json!({ "error": "email_taken" }));
        }
        Err(e) => {
            error!("[farmstead:http] Profile update failed: {e}");
            respond_json(request, 500, serde_json::json!({ "error": "internal" }));
        }
    }
}

/// PUT /api/settings/password
pub fn handle_password_update(
    manager: &GameManager,
    user: &User,
    body: &str,
    request: tiny_http::Request,
) {
    let req: PasswordUpdateRequest = match serde_json::from_str(body) {
        Ok(req) => req,
        Err(e) => {
            respond_json(
                request,
                400,
                serde_json::json!({ "error": "invalid_json", "details": e.to_string() }),
            );
            return;
        }
    };

    if !auth::verify_password(&req.current_password, &user.password_hash) {
        respond_json(request, 401, serde_json::json!({ "error": "invalid_credentials" }));
        return;
    }
    if req.new_password.is_empty() {
        respond_json(request, 400, serde_json::json!({ "error": "missing_fields" }));
        return;
    }

    let hash = auth::hash_password(&req.new_password);
    match manager.users().update_password(user.id, &hash) {
        Ok(()) => respond_json(request, 200, serde_json::json!({ "status": "ok" })),
        Err(e) => {
            error!("[farmstead:http] Password update failed: {e}");
            respond_json(request, 500, serde_json::json!({ "error": "internal" }));
        }
    }
}

/// POST /api/xp
pub fn handle_grant_xp(
    manager: &GameManager,
    user: &User,
    body: &str,
    request: tiny_http::Request,
) {
    let req: GrantXpRequest = match serde_json::from_str(body) {
        Ok(req) => req,
        Err(e) => {
            respond_json(
                request,
                400,
                serde_json::json!({ "error": "invalid_json", "details": e.to_string() }),
            );
            return;
        }
    };

    match manager.grant_xp(user.id, &user.name, req.amount) {
        Ok((progress, outcome)) => {
            let engine = manager.progression();
            respond_json(
                request,
                200,
                serde_json::json!({
                    "xp": progress.xp,
                    "level_id": progress.level_id,
                    "levels_gained": outcome.levels_gained,
                    "percent_to_next_level": engine.progress_to_next_level(&progress),
                    "can_level_up": engine.can_level_up(&progress),
                }),
            );
        }
        Err(ProgressionError::InvalidAmount(amount)) => {
            respond_json(
                request,
                400,
                serde_json::json!({ "error": "invalid_amount", "amount": amount }),
            );
        }
        Err(ProgressionError::Storage(e)) => {
            error!("[farmstead:http] Experience grant failed: {e}");
            respond_json(request, 500, serde_json::json!({ "error": "internal" }));
        }
    }
}
