//! People API handlers.
//!
//! ```text
//! POST /v1/api/people            — register an account
//! GET  /v1/api/people/{username} — probe username availability
//! ```
//!
//! Every response carries the legacy `Server` banner, an `X-Nintendo-Date`
//! epoch-milliseconds header, and a `text/xml` content type. Validation
//! failures answer HTTP 200 with the XML error body: legacy clients read
//! the body, not the status. Only server-side failures use HTTP 5xx.

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use mockable::Clock;
use tracing::{debug, error};

use crate::domain::registration::RegistrationStage;
use crate::domain::validation::{validate_client_credentials, validate_console_request};
use crate::domain::{ConsoleHeaders, Pid, RegistrationInput};
use crate::inbound::http::HttpState;
use crate::wire::{XmlDocument, XmlValue};

/// Extract the console identity headers without validating them.
fn console_headers(request: &HttpRequest) -> ConsoleHeaders {
    let header = |name: &str| {
        request
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    };
    ConsoleHeaders {
        client_id: header("X-Nintendo-Client-ID"),
        client_secret: header("X-Nintendo-Client-Secret"),
        serial_number: header("X-Nintendo-Serial-Number"),
        region: header("X-Nintendo-Region"),
        platform_id: header("X-Nintendo-Platform-ID"),
        device_id: header("X-Nintendo-Device-ID"),
        device_certificate: header("X-Nintendo-Device-Cert"),
    }
}

/// Build a response with the legacy header set.
fn legacy_reply(state: &HttpState, status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .insert_header(("Server", crate::domain::config::SERVER_BANNER))
        .insert_header((
            "X-Nintendo-Date",
            state.clock.utc().timestamp_millis().to_string(),
        ))
        .content_type("text/xml")
        .body(body)
}

fn success_document(pid: Pid) -> XmlDocument {
    XmlDocument::new(
        "person",
        XmlValue::map().push("pid", XmlValue::scalar(pid.to_string())),
    )
}

/// Register a user.
///
/// The body is read raw and parsed only after header validation so that a
/// request with bad credentials gets the credential error document no
/// matter what the body contains.
#[post("/people")]
pub async fn register_person(
    request: HttpRequest,
    state: web::Data<HttpState>,
    body: web::Bytes,
) -> HttpResponse {
    debug!(stage = ?RegistrationStage::Received, "registration request received");
    let headers = console_headers(&request);
    if let Err(rejection) = validate_client_credentials(&headers, &state.config) {
        debug!(code = rejection.code(), "registration rejected");
        return legacy_reply(&state, StatusCode::OK, rejection.to_document().encode());
    }
    debug!(stage = ?RegistrationStage::CredentialChecked, "client credentials accepted");

    let claim = match validate_console_request(&headers, &state.config) {
        Ok(claim) => claim,
        Err(rejection) => {
            debug!(code = rejection.code(), cause = ?rejection.cause(), "registration rejected");
            return legacy_reply(&state, StatusCode::OK, rejection.to_document().encode());
        }
    };
    debug!(stage = ?RegistrationStage::DeviceChecked, "console headers accepted");

    let input: RegistrationInput = match serde_json::from_slice(&body) {
        Ok(input) => input,
        Err(err) => {
            debug!(error = %err, "registration body rejected");
            return legacy_reply(&state, StatusCode::BAD_REQUEST, String::new());
        }
    };

    match state.registration.register(claim, input).await {
        Ok(pid) => {
            debug!(%pid, stage = ?RegistrationStage::Responded, "registration response sent");
            legacy_reply(&state, StatusCode::OK, success_document(pid).encode())
        }
        Err(err) => {
            error!(error = %err, "registration failed server-side");
            legacy_reply(&state, StatusCode::INTERNAL_SERVER_ERROR, String::new())
        }
    }
}

/// Check whether a username is already in use.
///
/// Status-only contract: HTTP 400 when taken, HTTP 200 when free, both
/// with an empty body and the standard legacy headers.
#[get("/people/{username}")]
pub async fn check_username(
    request: HttpRequest,
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> HttpResponse {
    let headers = console_headers(&request);
    if let Err(rejection) = validate_client_credentials(&headers, &state.config) {
        debug!(code = rejection.code(), "availability check rejected");
        return legacy_reply(&state, StatusCode::OK, rejection.to_document().encode());
    }

    match state.availability.is_taken(&path).await {
        Ok(true) => legacy_reply(&state, StatusCode::BAD_REQUEST, String::new()),
        Ok(false) => legacy_reply(&state, StatusCode::OK, String::new()),
        Err(err) => {
            error!(error = %err, "availability lookup failed server-side");
            legacy_reply(&state, StatusCode::INTERNAL_SERVER_ERROR, String::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::availability::MockUsernameAvailability;
    use crate::domain::ports::{AccountStoreError, PidAllocationError};
    use crate::domain::registration::MockPersonRegistration;
    use crate::domain::{AvailabilityError, RegistrationError, ServiceConfig};
    use actix_web::{App, test as actix_test};
    use chrono::{DateTime, Local, TimeZone, Utc};
    use mockable::Clock;
    use rstest::rstest;
    use std::sync::Arc;

    struct FixtureClock;

    impl Clock for FixtureClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2026, 8, 25, 10, 15, 30)
                .single()
                .expect("valid fixture timestamp")
        }
    }

    fn state(
        registration: MockPersonRegistration,
        availability: MockUsernameAvailability,
    ) -> HttpState {
        HttpState::new(
            Arc::new(registration),
            Arc::new(availability),
            Arc::new(FixtureClock),
            ServiceConfig::default().with_client("client-a", "secret-a"),
        )
    }

    fn test_app(
        state: HttpState,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
                actix_web::dev::ServiceRequest,
                Config = (),
                Response = actix_web::dev::ServiceResponse,
                Error = actix_web::Error,
                InitError = (),
            >,
    > {
        App::new().app_data(web::Data::new(state)).service(
            web::scope("/v1/api")
                .service(register_person)
                .service(check_username),
        )
    }

    fn valid_post() -> actix_test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/v1/api/people")
            .insert_header(("X-Nintendo-Client-ID", "client-a"))
            .insert_header(("X-Nintendo-Client-Secret", "secret-a"))
            .insert_header(("X-Nintendo-Serial-Number", "CW404567890"))
            .insert_header(("X-Nintendo-Region", "2"))
            .insert_header(("X-Nintendo-Platform-ID", "1"))
            .insert_header(("X-Nintendo-Device-ID", "1234567890"))
            .insert_header(("X-Nintendo-Device-Cert", "cert-blob"))
            .set_payload(r#"{"user_id":"ada-lovelace","password":"hunter2"}"#)
    }

    async fn body_string(response: actix_web::dev::ServiceResponse) -> String {
        let bytes = actix_test::read_body(response).await;
        String::from_utf8(bytes.to_vec()).expect("utf8 body")
    }

    #[actix_web::test]
    async fn successful_registration_returns_the_pid_document() {
        let mut registration = MockPersonRegistration::new();
        registration
            .expect_register()
            .times(1)
            .returning(|_, _| Ok(Pid::new(1_800_000_001)));
        let app =
            actix_test::init_service(test_app(state(registration, MockUsernameAvailability::new())))
                .await;

        let response = actix_test::call_service(&app, valid_post().to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get("Server")
                .and_then(|value| value.to_str().ok()),
            Some("Nintendo 3DS (http)")
        );
        let date = response
            .headers()
            .get("X-Nintendo-Date")
            .and_then(|value| value.to_str().ok())
            .expect("date header");
        assert_eq!(date, FixtureClock.utc().timestamp_millis().to_string());
        assert_eq!(
            response
                .headers()
                .get("Content-Type")
                .and_then(|value| value.to_str().ok()),
            Some("text/xml")
        );
        assert_eq!(
            body_string(response).await,
            "<person><pid>1800000001</pid></person>"
        );
    }

    #[actix_web::test]
    async fn credential_error_wins_regardless_of_body_and_other_headers() {
        let mut registration = MockPersonRegistration::new();
        registration.expect_register().never();
        let app =
            actix_test::init_service(test_app(state(registration, MockUsernameAvailability::new())))
                .await;

        let request = actix_test::TestRequest::post()
            .uri("/v1/api/people")
            .insert_header(("X-Nintendo-Client-ID", "client-a"))
            .insert_header(("X-Nintendo-Client-Secret", "wrong"))
            .set_payload("this is not even json")
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_string(response).await,
            "<errors><error><cause>client_id</cause><code>0004</code>\
             <message>API application invalid or incorrect application credentials</message>\
             </error></errors>"
        );
    }

    #[rstest]
    #[case::missing_serial(
        "X-Nintendo-Serial-Number",
        "<errors><error><code>0002</code>\
         <message>serialNumber format is invalid</message></error></errors>"
    )]
    #[case::missing_region(
        "X-Nintendo-Region",
        "<errors><error><cause>X-Nintendo-Region</cause><code>0002</code>\
         <message>X-Nintendo-Region format is invalid</message></error></errors>"
    )]
    #[case::missing_device(
        "X-Nintendo-Device-ID",
        "<errors><error><cause>device_id</cause><code>0113</code>\
         <message>Unauthorized device</message></error></errors>"
    )]
    #[actix_web::test]
    async fn missing_device_headers_answer_the_matching_legacy_error(
        #[case] dropped_header: &str,
        #[case] expected_body: &str,
    ) {
        let mut registration = MockPersonRegistration::new();
        registration.expect_register().never();
        let app =
            actix_test::init_service(test_app(state(registration, MockUsernameAvailability::new())))
                .await;

        let mut request = actix_test::TestRequest::post()
            .uri("/v1/api/people")
            .set_payload(r#"{"user_id":"ada-lovelace"}"#);
        for (name, value) in [
            ("X-Nintendo-Client-ID", "client-a"),
            ("X-Nintendo-Client-Secret", "secret-a"),
            ("X-Nintendo-Serial-Number", "CW404567890"),
            ("X-Nintendo-Region", "2"),
            ("X-Nintendo-Platform-ID", "1"),
            ("X-Nintendo-Device-ID", "1234567890"),
            ("X-Nintendo-Device-Cert", "cert-blob"),
        ] {
            if !name.eq_ignore_ascii_case(dropped_header) {
                request = request.insert_header((name, value));
            }
        }

        let response = actix_test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, expected_body);
    }

    #[rstest]
    #[case::allocator_exhausted(RegistrationError::PidAllocation(PidAllocationError::Exhausted))]
    #[case::allocator_down(RegistrationError::PidAllocation(PidAllocationError::unavailable(
        "allocation authority unreachable"
    )))]
    #[case::store(RegistrationError::Persistence(AccountStoreError::query("insert failed")))]
    #[actix_web::test]
    async fn server_side_failures_answer_http_500_with_an_empty_body(
        #[case] failure: RegistrationError,
    ) {
        let mut registration = MockPersonRegistration::new();
        registration
            .expect_register()
            .times(1)
            .returning(move |_, _| Err(failure.clone()));
        let app =
            actix_test::init_service(test_app(state(registration, MockUsernameAvailability::new())))
                .await;

        let response = actix_test::call_service(&app, valid_post().to_request()).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().contains_key("X-Nintendo-Date"));
        assert!(body_string(response).await.is_empty());
    }

    #[actix_web::test]
    async fn malformed_body_after_valid_headers_answers_http_400() {
        let mut registration = MockPersonRegistration::new();
        registration.expect_register().never();
        let app =
            actix_test::init_service(test_app(state(registration, MockUsernameAvailability::new())))
                .await;

        let response = actix_test::call_service(
            &app,
            valid_post().set_payload("not json").to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_string(response).await.is_empty());
    }

    #[rstest]
    #[case::taken(true, StatusCode::BAD_REQUEST)]
    #[case::free(false, StatusCode::OK)]
    #[actix_web::test]
    async fn availability_is_signalled_by_status_only(
        #[case] taken: bool,
        #[case] expected_status: StatusCode,
    ) {
        let mut availability = MockUsernameAvailability::new();
        availability
            .expect_is_taken()
            .withf(|username| username == "ada-lovelace")
            .times(1)
            .returning(move |_| Ok(taken));
        let app =
            actix_test::init_service(test_app(state(MockPersonRegistration::new(), availability)))
                .await;

        let request = actix_test::TestRequest::get()
            .uri("/v1/api/people/ada-lovelace")
            .insert_header(("X-Nintendo-Client-ID", "client-a"))
            .insert_header(("X-Nintendo-Client-Secret", "secret-a"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), expected_status);
        assert!(response.headers().contains_key("Server"));
        assert!(response.headers().contains_key("X-Nintendo-Date"));
        assert_eq!(
            response
                .headers()
                .get("Content-Type")
                .and_then(|value| value.to_str().ok()),
            Some("text/xml")
        );
        assert!(body_string(response).await.is_empty());
    }

    #[actix_web::test]
    async fn availability_check_rejects_bad_credentials_with_the_legacy_document() {
        let mut availability = MockUsernameAvailability::new();
        availability.expect_is_taken().never();
        let app =
            actix_test::init_service(test_app(state(MockPersonRegistration::new(), availability)))
                .await;

        let request = actix_test::TestRequest::get()
            .uri("/v1/api/people/ada-lovelace")
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("<code>0004</code>"));
        assert!(body.contains("<cause>client_id</cause>"));
    }

    #[actix_web::test]
    async fn availability_lookup_failure_answers_http_500() {
        let mut availability = MockUsernameAvailability::new();
        availability
            .expect_is_taken()
            .returning(|_| Err(AvailabilityError::Lookup(AccountStoreError::connection(
                "store offline",
            ))));
        let app =
            actix_test::init_service(test_app(state(MockPersonRegistration::new(), availability)))
                .await;

        let request = actix_test::TestRequest::get()
            .uri("/v1/api/people/ada-lovelace")
            .insert_header(("X-Nintendo-Client-ID", "client-a"))
            .insert_header(("X-Nintendo-Client-Secret", "secret-a"))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
