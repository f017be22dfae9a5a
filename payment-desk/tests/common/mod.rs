#![allow(dead_code)]

use payment_desk::config::{
    ServerSettings, SessionSettings, Settings, TelemetrySettings, UpstreamSettings,
};
use payment_desk::startup::Application;
use serde_json::{json, Value};
use wiremock::MockServer;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub booking_api: MockServer,
    pub payment_link_api: MockServer,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_base_url(None).await
    }

    /// Both upstream APIs point at a port nothing listens on.
    pub async fn spawn_with_unreachable_upstreams() -> Self {
        Self::spawn_with_base_url(Some(closed_port_url())).await
    }

    async fn spawn_with_base_url(upstream_override: Option<String>) -> Self {
        let _ = payment_desk::services::init_metrics();

        let booking_api = MockServer::start().await;
        let payment_link_api = MockServer::start().await;

        let settings = Settings {
            server: ServerSettings {
                host: "127.0.0.1".to_string(),
                port: 0, // Random port
                allowed_origins: vec![],
            },
            booking_api: UpstreamSettings {
                base_url: upstream_override
                    .clone()
                    .unwrap_or_else(|| booking_api.uri()),
            },
            payment_link_api: UpstreamSettings {
                base_url: upstream_override.unwrap_or_else(|| payment_link_api.uri()),
            },
            session: SessionSettings::default(),
            telemetry: TelemetrySettings::default(),
        };

        let app = Application::build(settings)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            booking_api,
            payment_link_api,
            client,
        }
    }

    /// Open a form session and return its id.
    pub async fn create_session(&self) -> String {
        let response = self
            .client
            .post(format!("{}/sessions", self.address))
            .send()
            .await
            .expect("Failed to create session");
        assert_eq!(response.status().as_u16(), 201);

        let body: Value = response.json().await.expect("Invalid session body");
        body["session_id"]
            .as_str()
            .expect("session_id missing")
            .to_string()
    }

    pub async fn get_session(&self, session_id: &str) -> reqwest::Response {
        self.client
            .get(format!("{}/sessions/{}", self.address, session_id))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_lookup(&self, session_id: &str, body: Value) -> reqwest::Response {
        self.client
            .post(format!("{}/sessions/{}/lookup", self.address, session_id))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_payment_link(&self, session_id: &str, body: Value) -> reqwest::Response {
        self.client
            .post(format!(
                "{}/sessions/{}/payment-link",
                self.address, session_id
            ))
            .json(&body)
            .send()
            .await
            .expect("Failed to execute request")
    }
}

fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind a free port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

/// Wait until the session has left its in-flight state.
pub async fn wait_for_settled(app: &TestApp, session_id: &str) -> Value {
    for _ in 0..40 {
        let session: Value = app.get_session(session_id).await.json().await.unwrap();
        let state = session["state"].as_str().unwrap_or_default().to_string();
        if state != "looking_up" && state != "creating_link" {
            return session;
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
    }
    panic!("session {} never settled", session_id);
}

/// Booking API body for a single reservation.
pub fn booking_body(total: &str, paid: &str, extra_charges: Value) -> Value {
    json!({
        "Reservations": {
            "Reservation": [{
                "FirstName": "Maria",
                "LastName": "Santos",
                "BookingTran": [{
                    "TotalAmountAfterTax": total,
                    "TotalPayment": paid,
                    "RateplanName": "Standard Rate",
                    "ExtraCharge": extra_charges
                }]
            }]
        }
    })
}
