//! An in-memory development server for the SPX HTTP surface.
//!
//! The server keeps models and instances in memory and evaluates ramp and
//! noise actions with a simple built-in engine, which is enough to run the
//! examples and client tests without a real SPX installation.
//!
//! Routes:
//!
//! - `GET /`: health check
//! - `PUT /models/{model}`: register a model descriptor (JSON)
//! - `PUT /instances/{instance}`: bind an instance: `{"model": "..."}`
//! - `PUT /instances/{instance}/timer`: set the timer: `{"time": 1.5}`
//! - `POST /prepare`: reset instances and enable stepping
//! - `POST /run`: evaluate every instance at its timer
//! - `GET /instances/{instance}/attributes/{attribute}`: read both layers
//!
//! Every route except the health check requires a non-empty
//! `x-product-key` header.
//!
//! # Example
//!
//! ```no_run
//! use spx_dev::DevServer;
//!
//! #[tokio::main]
//! async fn main() {
//!     DevServer::new().run(([127, 0, 0, 1], 8000)).await;
//! }
//! ```

mod engine;
mod state;

use std::{
    convert::Infallible,
    future::Future,
    io,
    net::SocketAddr,
    sync::{Arc, Mutex, MutexGuard, PoisonError, mpsc},
    thread,
};

use serde::{Deserialize, Serialize};
use spx_core::ModelDescriptor;
use warp::{
    Filter, Rejection, Reply,
    http::StatusCode,
    reply::{Response, json, with_status},
};

pub use state::ServerError;

use state::State;

/// Header carrying the product key.
pub const PRODUCT_KEY_HEADER: &str = "x-product-key";

type Shared = Arc<Mutex<State>>;

#[derive(Debug)]
struct Unauthorized;

impl warp::reject::Reject for Unauthorized {}

#[derive(Serialize)]
struct Ack {
    status: &'static str,
}

const ACK: Ack = Ack { status: "ok" };

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct InstanceBinding {
    model: String,
}

#[derive(Deserialize)]
struct TimerUpdate {
    time: f64,
}

/// The development server and its in-memory state.
#[derive(Clone, Default)]
pub struct DevServer {
    state: Shared,
}

impl DevServer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the server's routes.
    ///
    /// The filter shares this server's state but does not borrow the server.
    pub fn routes(
        &self,
    ) -> impl Filter<Extract = (impl Reply + use<>,), Error = Infallible> + Clone + use<> {
        let state = self.state.clone();
        let with_state = warp::any().map(move || state.clone());

        let health = warp::path::end()
            .and(warp::get())
            .map(|| json(&ACK));

        let register_model = warp::path!("models" / String)
            .and(warp::put())
            .and(authorized())
            .and(warp::body::json())
            .and(with_state.clone())
            .map(|name: String, descriptor: ModelDescriptor, state: Shared| {
                respond(lock(&state).register_model(&name, descriptor).map(|()| ACK))
            });

        let bind_instance = warp::path!("instances" / String)
            .and(warp::put())
            .and(authorized())
            .and(warp::body::json())
            .and(with_state.clone())
            .map(|name: String, binding: InstanceBinding, state: Shared| {
                respond(lock(&state).bind_instance(&name, &binding.model).map(|()| ACK))
            });

        let set_timer = warp::path!("instances" / String / "timer")
            .and(warp::put())
            .and(authorized())
            .and(warp::body::json())
            .and(with_state.clone())
            .map(|name: String, update: TimerUpdate, state: Shared| {
                respond(lock(&state).set_timer(&name, update.time).map(|()| ACK))
            });

        let read_attribute = warp::path!("instances" / String / "attributes" / String)
            .and(warp::get())
            .and(authorized())
            .and(with_state.clone())
            .map(|name: String, attribute: String, state: Shared| {
                respond(lock(&state).attribute(&name, &attribute))
            });

        let prepare = warp::path!("prepare")
            .and(warp::post())
            .and(authorized())
            .and(with_state.clone())
            .map(|state: Shared| {
                lock(&state).prepare();
                json(&ACK).into_response()
            });

        let run = warp::path!("run")
            .and(warp::post())
            .and(authorized())
            .and(with_state)
            .map(|state: Shared| respond(lock(&state).run().map(|()| ACK)));

        health
            .or(register_model)
            .or(bind_instance)
            .or(set_timer)
            .or(read_attribute)
            .or(prepare)
            .or(run)
            .recover(recover)
            .with(warp::log("spx_dev"))
    }

    /// Serves on `addr` until the process exits.
    pub async fn run(self, addr: impl Into<SocketAddr>) {
        warp::serve(self.routes()).run(addr).await;
    }

    /// Binds to `addr` (use port 0 for an ephemeral port) and returns the
    /// bound address with the server future.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound.
    pub fn bind(
        self,
        addr: impl Into<SocketAddr>,
    ) -> Result<(SocketAddr, impl Future<Output = ()> + 'static), warp::Error> {
        warp::serve(self.routes()).try_bind_ephemeral(addr)
    }
}

/// Starts a development server on an ephemeral localhost port in a
/// background thread and returns its address.
///
/// The server runs until the process exits.
///
/// # Errors
///
/// Returns an error if the runtime cannot be built or the port cannot be bound.
pub fn spawn_in_background() -> io::Result<SocketAddr> {
    let (tx, rx) = mpsc::channel();

    thread::Builder::new()
        .name("spx-dev".to_owned())
        .spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
            {
                Ok(runtime) => runtime,
                Err(err) => {
                    let _ = tx.send(Err(err));
                    return;
                }
            };

            runtime.block_on(async move {
                match DevServer::new().bind(([127, 0, 0, 1], 0)) {
                    Ok((addr, server)) => {
                        let _ = tx.send(Ok(addr));
                        server.await;
                    }
                    Err(err) => {
                        let _ = tx.send(Err(io::Error::other(err)));
                    }
                }
            });
        })?;

    rx.recv()
        .map_err(|_| io::Error::other("development server thread exited before binding"))?
}

fn authorized() -> impl Filter<Extract = (), Error = Rejection> + Clone {
    warp::header::optional::<String>(PRODUCT_KEY_HEADER)
        .and_then(|key: Option<String>| async move {
            match key {
                Some(key) if !key.trim().is_empty() => Ok(()),
                _ => Err(warp::reject::custom(Unauthorized)),
            }
        })
        .untuple_one()
}

fn lock(state: &Shared) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

fn respond<T: Serialize>(result: Result<T, ServerError>) -> Response {
    match result {
        Ok(body) => json(&body).into_response(),
        Err(err) => {
            log::warn!("request rejected: {err}");
            error_response(err.status(), err.to_string())
        }
    }
}

fn error_response(status: StatusCode, error: String) -> Response {
    with_status(json(&ErrorBody { error }), status).into_response()
}

async fn recover(rejection: Rejection) -> Result<Response, Infallible> {
    let response = if rejection.find::<Unauthorized>().is_some() {
        error_response(
            StatusCode::UNAUTHORIZED,
            format!("missing {PRODUCT_KEY_HEADER} header"),
        )
    } else if let Some(err) = rejection.find::<warp::filters::body::BodyDeserializeError>() {
        error_response(StatusCode::BAD_REQUEST, err.to_string())
    } else if rejection.is_not_found() {
        error_response(StatusCode::NOT_FOUND, "not found".to_owned())
    } else if rejection.find::<warp::reject::MethodNotAllowed>().is_some() {
        error_response(
            StatusCode::METHOD_NOT_ALLOWED,
            "method not allowed".to_owned(),
        )
    } else {
        log::error!("unhandled rejection: {rejection:?}");
        error_response(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal error".to_owned(),
        )
    };

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::{Value, json as value};
    use warp::test::request;

    const KEY: &str = "test-key";

    fn descriptor() -> Value {
        value!({
            "attributes": { "temperature": 0.0 },
            "actions": [
                { "ramp": "$in(temperature)", "stop_value": 10.0, "duration": 1.0 }
            ]
        })
    }

    async fn put(server: &DevServer, path: &str, body: &Value) -> StatusCode {
        request()
            .method("PUT")
            .path(path)
            .header(PRODUCT_KEY_HEADER, KEY)
            .json(body)
            .reply(&server.routes())
            .await
            .status()
    }

    async fn post(server: &DevServer, path: &str) -> StatusCode {
        request()
            .method("POST")
            .path(path)
            .header(PRODUCT_KEY_HEADER, KEY)
            .reply(&server.routes())
            .await
            .status()
    }

    #[tokio::test]
    async fn health_needs_no_key() {
        let server = DevServer::new();
        let response = request().path("/").reply(&server.routes()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_key_is_unauthorized() {
        let server = DevServer::new();
        let response = request()
            .method("PUT")
            .path("/models/pt_100")
            .json(&descriptor())
            .reply(&server.routes())
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn full_step_reads_ramped_value() {
        let server = DevServer::new();

        assert_eq!(put(&server, "/models/m", &descriptor()).await, StatusCode::OK);
        assert_eq!(
            put(&server, "/instances/i", &value!({ "model": "m" })).await,
            StatusCode::OK
        );
        assert_eq!(post(&server, "/run").await, StatusCode::CONFLICT);
        assert_eq!(post(&server, "/prepare").await, StatusCode::OK);
        assert_eq!(
            put(&server, "/instances/i/timer", &value!({ "time": 0.5 })).await,
            StatusCode::OK
        );
        assert_eq!(post(&server, "/run").await, StatusCode::OK);

        let response = request()
            .path("/instances/i/attributes/temperature")
            .header(PRODUCT_KEY_HEADER, KEY)
            .reply(&server.routes())
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(body["internal_value"], value!(5.0));
        assert_eq!(body["external_value"], value!(5.0));
    }

    #[tokio::test]
    async fn undeclared_target_is_unprocessable() {
        let server = DevServer::new();
        let body = value!({
            "attributes": { "temperature": 0.0 },
            "actions": [{ "noise": "$out(pressure)", "std": 0.1, "mode": "absolute" }]
        });
        assert_eq!(
            put(&server, "/models/m", &body).await,
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[tokio::test]
    async fn bound_server_answers_over_tcp() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let (addr, server) = DevServer::new().bind(([127, 0, 0, 1], 0)).unwrap();
        tokio::spawn(server);

        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();

        assert!(response.starts_with("HTTP/1.1 200 OK"), "{response}");
        assert!(response.contains(r#"{"status":"ok"}"#), "{response}");
    }

    #[tokio::test]
    async fn unknown_model_is_not_found() {
        let server = DevServer::new();
        assert_eq!(
            put(&server, "/instances/i", &value!({ "model": "missing" })).await,
            StatusCode::NOT_FOUND
        );
    }
}
