//! HTTP server for the game API
//!
//! Listens on localhost and serves the JSON endpoints the web client
//! uses: registration/login, the dashboard, profile and settings, and
//! experience grants. Sessions are carried in the `X-Farmstead-Token`
//! header.

mod handlers;

use std::io::Read;

use anyhow::{Context, Result};
use tiny_http::{Response, Server};
use tracing::{error, info};

use crate::game::GameManager;
use crate::store::User;

const AUTH_HEADER: &str = "X-Farmstead-Token";
const MAX_BODY_BYTES: usize = 64 * 1024;

/// The API server, bound but not yet serving
pub struct GameServer {
    server: Server,
    manager: GameManager,
}

impl GameServer {
    /// Bind the server to an address (`host:port`; port 0 picks a free one)
    pub fn bind(manager: GameManager, addr: &str) -> Result<Self> {
        let server = Server::http(addr)
            .map_err(|e| anyhow::anyhow!("Failed to bind {addr}: {e}"))?;
        info!("[farmstead:http] Server listening on http://{addr}");
        Ok(Self { server, manager })
    }

    /// Port the server actually bound to
    pub fn port(&self) -> Result<u16> {
        self.server
            .server_addr()
            .to_ip()
            .map(|a| a.port())
            .context("server is not bound to an IP address")
    }

    /// Serve requests until the process exits
    pub fn run(&self) {
        for mut request in self.server.incoming_requests() {
            let method = request.method().to_string();
            let url = request.url().to_string();
            let path = url.split('?').next().unwrap_or(url.as_str());

            match (method.as_str(), path) {
                ("GET", "/api/ping") => {
                    respond_json(
                        request,
                        200,
                        serde_json::json!({
                            "status": "ok",
                            "version": env!("CARGO_PKG_VERSION"),
                        }),
                    );
                }

                ("POST", "/api/register") => {
                    let body = match read_request_body(&mut request) {
                        Ok(body) => body,
                        Err(response) => {
                            let _ = request.respond(response);
                            continue;
                        }
                    };
                    handlers::handle_register(&self.manager, &body, request);
                }
                ("POST", "/api/login") => {
                    let body = match read_request_body(&mut request) {
                        Ok(body) => body,
                        Err(response) => {
                            let _ = request.respond(response);
                            continue;
                        }
                    };
                    handlers::handle_login(&self.manager, &body, request);
                }
                ("POST", "/api/logout") => {
                    let Some(token) = session_token(&request) else {
                        respond_unauthorized(request);
                        continue;
                    };
                    handlers::handle_logout(&self.manager, &token, request);
                }

                ("GET", "/api/dashboard") => {
                    let Some(user) = self.authenticate(&request) else {
                        respond_unauthorized(request);
                        continue;
                    };
                    handlers::handle_dashboard(&self.manager, &user, request);
                }
                ("GET", "/api/profile") => {
                    let Some(user) = self.authenticate(&request) else {
                        respond_unauthorized(request);
                        continue;
                    };
                    handlers::handle_profile_get(&self.manager, &user, request);
                }
                ("PUT", "/api/profile") => {
                    let Some(user) = self.authenticate(&request) else {
                        respond_unauthorized(request);
                        continue;
                    };
                    let body = match read_request_body(&mut request) {
                        Ok(body) => body,
                        Err(response) => {
                            let _ = request.respond(response);
                            continue;
                        }
                    };
                    handlers::handle_profile_update(&self.manager, &user, &body, request);
                }
                ("PUT", "/api/settings/password") => {
                    let Some(user) = self.authenticate(&request) else {
                        respond_unauthorized(request);
                        continue;
                    };
                    let body = match read_request_body(&mut request) {
                        Ok(body) => body,
                        Err(response) => {
                            let _ = request.respond(response);
                            continue;
                        }
                    };
                    handlers::handle_password_update(&self.manager, &user, &body, request);
                }
                ("POST", "/api/xp") => {
                    let Some(user) = self.authenticate(&request) else {
                        respond_unauthorized(request);
                        continue;
                    };
                    let body = match read_request_body(&mut request) {
                        Ok(body) => body,
                        Err(response) => {
                            let _ = request.respond(response);
                            continue;
                        }
                    };
                    handlers::handle_grant_xp(&self.manager, &user, &body, request);
                }

                _ => {
                    let response = Response::from_string("{\"error\":\"not_found\"}")
                        .with_status_code(404)
                        .with_header(json_content_type());
                    let _ = request.respond(response);
                }
            }
        }
    }

    /// Resolve the request's session token to a user
    fn authenticate(&self, request: &tiny_http::Request) -> Option<User> {
        let token = session_token(request)?;
        let user_id = match self.manager.sessions().user_for_token(&token) {
            Ok(id) => id?,
            Err(e) => {
                error!("[farmstead:http] Session lookup failed: {e}");
                return None;
            }
        };
        match self.manager.users().get(user_id) {
            Ok(user) => user,
            Err(e) => {
                error!("[farmstead:http] User lookup failed: {e}");
                None
            }
        }
    }
}

fn session_token(request: &tiny_http::Request) -> Option<String> {
    request
        .headers()
        .iter()
        .find(|h| h.field.equiv(AUTH_HEADER))
        .map(|h| h.value.as_str().to_string())
}

fn json_content_type() -> tiny_http::Header {
    tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap()
}

fn respond_unauthorized(request: tiny_http::Request) {
    let response = Response::from_string("{\"error\":\"unauthorized\"}")
        .with_status_code(401)
        .with_header(json_content_type());
    let _ = request.respond(response);
}

fn read_request_body(
    request: &mut tiny_http::Request,
) -> std::result::Result<String, Response<std::io::Cursor<Vec<u8>>>> {
    let mut body = String::new();
    let mut reader = request.as_reader().take((MAX_BODY_BYTES + 1) as u64);
    if let Err(e) = reader.read_to_string(&mut body) {
        error!("[farmstead:http] Failed to read body: {e}");
        let response = Response::from_string("{\"error\":\"bad_request\"}")
            .with_status_code(400)
            .with_header(json_content_type());
        return Err(response);
    }

    if body.len() > MAX_BODY_BYTES {
        let response = Response::from_string("{\"error\":\"payload_too_large\"}")
            .with_status_code(413)
            .with_header(json_content_type());
        return Err(response);
    }

    Ok(body)
}

fn respond_json(request: tiny_http::Request, status_code: u16, value: serde_json::Value) {
    let body =
        serde_json::to_string(&value).unwrap_or_else(|_| "{\"error\":\"serialize\"}".to_string());
    let response = Response::from_string(body)
        .with_status_code(status_code)
        .with_header(json_content_type());
    let _ = request.respond(response);
}
