//! Request handlers.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{Extension, Form as PostedForm, Json};
use bookings_forms::Form;
use bookings_render::TemplateData;
use tracing::{error, warn};

use crate::context::AppContext;
use crate::csrf::{CsrfIssuer, CSRF_FIELD};
use crate::models::{AvailabilityResponse, Reservation};
use crate::session::{ClientAddr, Session};

type AppState = State<Arc<AppContext>>;

/// Render a page on the blocking pool, answering 500 when it cannot be
/// produced.
async fn render_page(
    app: Arc<AppContext>,
    session: Session,
    page: &'static str,
    data: TemplateData,
) -> Response {
    let data = with_session_messages(&session, data);
    let render_session = session.clone();
    let result = tokio::task::spawn_blocking(move || {
        app.renderer.render_to_vec(&render_session, page, data)
    })
    .await;

    match result {
        Ok(Ok(body)) => {
            consume_session_messages(&session);
            Html(body).into_response()
        }
        Ok(Err(e)) => {
            error!("Could not render {}: {}", page, e);
            server_error()
        }
        Err(e) => {
            error!("Render task for {} failed: {}", page, e);
            server_error()
        }
    }
}

const SESSION_MESSAGES: [&str; 3] = ["flash", "warning", "error"];

/// Copy one-shot messages left in the session by an earlier request into
/// the page. Messages already set by the handler win.
fn with_session_messages(session: &Session, mut data: TemplateData) -> TemplateData {
    for (key, slot) in SESSION_MESSAGES
        .into_iter()
        .zip([&mut data.flash, &mut data.warning, &mut data.error])
    {
        if slot.is_empty() {
            *slot = session.get_string(key);
        }
    }
    data
}

/// One-shot messages are dropped only once a page showing them was produced.
fn consume_session_messages(session: &Session) {
    for key in SESSION_MESSAGES {
        session.pop_string(key);
    }
}

fn server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

/// Reject a submission whose token doesn't belong to the session.
fn check_csrf(session: &Session, posted: &HashMap<String, String>) -> Result<(), Response> {
    let token = posted.get(CSRF_FIELD).map(String::as_str).unwrap_or("");
    if CsrfIssuer.verify(session, token) {
        Ok(())
    } else {
        warn!("Rejected form submission with invalid anti-forgery token");
        Err((StatusCode::BAD_REQUEST, "Bad Request").into_response())
    }
}

/// Home page; remembers the visitor's address.
pub async fn home(
    State(app): AppState,
    Extension(session): Extension<Session>,
    Extension(ClientAddr(client)): Extension<ClientAddr>,
) -> Response {
    if let Some(addr) = client {
        session.put_string("remote_ip", addr.ip().to_string());
    }
    render_page(app, session, "home.page.tmpl", TemplateData::new()).await
}

pub async fn about(State(app): AppState, Extension(session): Extension<Session>) -> Response {
    let data = TemplateData::new()
        .with_string("test", "Hello, again.")
        .with_string("remote_ip", session.get_string("remote_ip"));
    render_page(app, session, "about.page.tmpl", data).await
}

pub async fn generals(State(app): AppState, Extension(session): Extension<Session>) -> Response {
    render_page(app, session, "generals.page.tmpl", TemplateData::new()).await
}

pub async fn majors(State(app): AppState, Extension(session): Extension<Session>) -> Response {
    render_page(app, session, "majors.page.tmpl", TemplateData::new()).await
}

pub async fn contact(State(app): AppState, Extension(session): Extension<Session>) -> Response {
    render_page(app, session, "contact.page.tmpl", TemplateData::new()).await
}

pub async fn availability(
    State(app): AppState,
    Extension(session): Extension<Session>,
) -> Response {
    render_page(app, session, "search-availability.page.tmpl", TemplateData::new()).await
}

pub async fn post_availability(
    Extension(session): Extension<Session>,
    PostedForm(posted): PostedForm<HashMap<String, String>>,
) -> Response {
    if let Err(rejected) = check_csrf(&session, &posted) {
        return rejected;
    }

    let form = Form::new(posted);
    format!(
        "start date is {} and end date is {}",
        form.get("start"),
        form.get("end")
    )
    .into_response()
}

pub async fn availability_json(
    Extension(session): Extension<Session>,
    PostedForm(posted): PostedForm<HashMap<String, String>>,
) -> Response {
    if let Err(rejected) = check_csrf(&session, &posted) {
        return rejected;
    }

    Json(AvailabilityResponse {
        ok: true,
        message: "Available!".to_string(),
    })
    .into_response()
}

/// Empty reservation form.
pub async fn reservation(
    State(app): AppState,
    Extension(session): Extension<Session>,
) -> Response {
    let data = TemplateData::new().with_data(
        "reservation",
        serde_json::to_value(Reservation::default()).unwrap_or_default(),
    );
    render_page(app, session, "make-reservation.page.tmpl", data).await
}

/// Validate the reservation form; stash a valid reservation in the session.
pub async fn post_reservation(
    State(app): AppState,
    Extension(session): Extension<Session>,
    PostedForm(posted): PostedForm<HashMap<String, String>>,
) -> Response {
    if let Err(rejected) = check_csrf(&session, &posted) {
        return rejected;
    }

    let mut form = Form::new(posted);
    let reservation = Reservation::from_form(&form);

    form.required(&["first_name", "last_name", "email"]);
    form.min_length("first_name", 3);
    form.is_email("email");

    if !form.valid() {
        let data = TemplateData::new()
            .with_data(
                "reservation",
                serde_json::to_value(&reservation).unwrap_or_default(),
            )
            .with_form(form);
        return render_page(app, session, "make-reservation.page.tmpl", data).await;
    }

    if let Err(e) = session.put("reservation", &reservation) {
        error!("Could not store reservation in session: {}", e);
        return server_error();
    }
    Redirect::to("/reservation-summary").into_response()
}

/// Show the reservation stashed by [`post_reservation`], once.
pub async fn reservation_summary(
    State(app): AppState,
    Extension(session): Extension<Session>,
) -> Response {
    let Some(reservation) = session.pop::<Reservation>("reservation") else {
        warn!("Cannot get reservation from session");
        session.put_string("error", "Can't get reservation from session");
        return Redirect::temporary("/").into_response();
    };

    let data = match TemplateData::new().with_entity(&reservation) {
        Ok(data) => data.with_flash("Reservation submitted"),
        Err(e) => {
            error!("Could not attach reservation: {}", e);
            return server_error();
        }
    };
    render_page(app, session, "reservation-summary.page.tmpl", data).await
}
