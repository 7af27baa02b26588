//! HTML rendering
//!
//! Every interpolated value goes through [`escape`]. Pages share one
//! layout with a nav bar (when logged in) and the flash banners.

use std::fmt::Write;

use axum::response::Html;
use chrono::NaiveDate;

use super::catways::CatwayForm;
use super::reservations::ReservationForm;
use super::users::UserForm;
use super::Flash;
use crate::auth::Session;
use crate::models::{Berth, Reservation, User};

const STYLE: &str = "body{font-family:sans-serif;margin:0;background:#f4f7fa;color:#1d2b36}\
nav{background:#0b3d5c;padding:.6em 1em}nav a{color:#fff;margin-right:1em;text-decoration:none}\
main{max-width:960px;margin:1.5em auto;padding:0 1em}\
table{border-collapse:collapse;width:100%;background:#fff}th,td{padding:.4em .6em;border-bottom:1px solid #dde}\
.success{background:#dff5e1;padding:.6em;margin-bottom:1em}.error{background:#fbe0e0;padding:.6em;margin-bottom:1em}\
form.inline{display:inline}label{display:block;margin-top:.6em}";

/// Escape text for HTML element content and attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn page(title: &str, session: Option<&Session>, flash: &Flash, body: &str) -> Html<String> {
    let nav = match session {
        Some(s) => format!(
            "<nav><a href=\"/dashboard\">Dashboard</a><a href=\"/catways\">Catways</a>\
             <a href=\"/reservations\">Reservations</a><a href=\"/users\">Users</a>\
             <a href=\"/logout\">Log out ({})</a></nav>",
            escape(&s.username)
        ),
        None => String::new(),
    };

    Html(format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <title>{title} · Marina</title><style>{STYLE}</style></head>\
         <body>{nav}<main><h1>{title}</h1>{banners}{body}</main></body></html>",
        title = escape(title),
        banners = banners(flash),
    ))
}

fn banners(flash: &Flash) -> String {
    let mut out = String::new();
    if let Some(msg) = flash.success.as_deref() {
        let _ = write!(out, "<p class=\"success\">{}</p>", escape(msg));
    }
    if let Some(msg) = flash.error.as_deref() {
        let _ = write!(out, "<p class=\"error\">{}</p>", escape(msg));
    }
    out
}

fn error_flash(error: Option<&str>) -> Flash {
    Flash {
        success: None,
        error: error.map(str::to_owned),
    }
}

fn input(label: &str, name: &str, kind: &str, value: &str) -> String {
    format!(
        "<label>{label}<br><input type=\"{kind}\" name=\"{name}\" value=\"{value}\"></label>",
        label = escape(label),
        name = name,
        kind = kind,
        value = escape(value),
    )
}

fn post_button(action: &str, label: &str) -> String {
    format!(
        "<form class=\"inline\" method=\"post\" action=\"{}\"><button type=\"submit\">{}</button></form>",
        escape(action),
        escape(label)
    )
}

fn date(d: NaiveDate) -> String {
    d.format("%Y-%m-%d").to_string()
}

fn reservation_rows(reservations: &[Reservation], actions: bool) -> String {
    let mut rows = String::new();
    for r in reservations {
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>",
            r.catway_number,
            escape(&r.client_name),
            escape(&r.boat_name),
            date(r.start_date),
            date(r.end_date),
        );
        if actions {
            let _ = write!(
                rows,
                "<td><a href=\"/reservations/{id}/edit\">Edit</a> {delete}</td>",
                id = r.id,
                delete = post_button(&format!("/reservations/{}/delete", r.id), "Delete"),
            );
        }
        rows.push_str("</tr>");
    }
    rows
}

const RESERVATION_HEAD: &str =
    "<tr><th>Catway</th><th>Client</th><th>Boat</th><th>Start</th><th>End</th>";

/// `/` - login form
pub fn login_page(flash: &Flash) -> Html<String> {
    let body = format!(
        "<form method=\"post\" action=\"/login\">{}{}<p><button type=\"submit\">Log in</button></p></form>",
        input("Email", "email", "email", ""),
        input("Password", "password", "password", ""),
    );
    page("Marina staff login", None, flash, &body)
}

/// `/dashboard` - today's occupancy
pub fn dashboard(
    session: &Session,
    flash: &Flash,
    today: NaiveDate,
    current: &[Reservation],
    berth_count: usize,
    reservation_count: usize,
) -> Html<String> {
    let mut body = format!(
        "<p>Welcome, {}.</p><p>{} catways, {} reservations on file.</p>\
         <h2>In progress on {}</h2>",
        escape(&session.username),
        berth_count,
        reservation_count,
        date(today),
    );
    if current.is_empty() {
        body.push_str("<p>No reservation in progress today.</p>");
    } else {
        let _ = write!(
            body,
            "<table>{}</tr>{}</table>",
            RESERVATION_HEAD,
            reservation_rows(current, false)
        );
    }
    page("Dashboard", Some(session), flash, &body)
}

/// `/catways`
pub fn catway_list(session: &Session, flash: &Flash, berths: &[Berth]) -> Html<String> {
    let mut rows = String::new();
    for b in berths {
        let _ = write!(
            rows,
            "<tr><td>{n}</td><td>{kind}</td><td>{state}</td>\
             <td><a href=\"/catways/{n}/edit\">Edit</a> {delete}</td></tr>",
            n = b.catway_number,
            kind = b.catway_type,
            state = escape(&b.catway_state),
            delete = post_button(&format!("/catways/{}/delete", b.catway_number), "Delete"),
        );
    }
    let body = format!(
        "<p><a href=\"/catways/add\">Add a catway</a></p>\
         <table><tr><th>Number</th><th>Type</th><th>State</th><th></th></tr>{}</table>",
        rows
    );
    page("Catways", Some(session), flash, &body)
}

/// `/catways/add`
pub fn catway_add_form(session: &Session, form: &CatwayForm, error: Option<&str>) -> Html<String> {
    let kind = form.catway_type.as_deref().unwrap_or("short");
    let option = |value: &str| {
        let selected = if kind == value { " selected" } else { "" };
        format!("<option value=\"{0}\"{1}>{0}</option>", value, selected)
    };
    let body = format!(
        "<form method=\"post\" action=\"/catways/add\">{}\
         <label>Type<br><select name=\"catwayType\">{}{}</select></label>{}\
         <p><button type=\"submit\">Create</button> <a href=\"/catways\">Cancel</a></p></form>",
        input("Number", "catwayNumber", "number", form.catway_number.as_deref().unwrap_or("")),
        option("short"),
        option("long"),
        input("State", "catwayState", "text", form.catway_state.as_deref().unwrap_or("")),
    );
    page("New catway", Some(session), &error_flash(error), &body)
}

/// `/catways/{id}/edit` - only the state can change
pub fn catway_edit_form(
    session: &Session,
    berth: &Berth,
    state_value: &str,
    error: Option<&str>,
) -> Html<String> {
    let body = format!(
        "<p>Catway {n} ({kind})</p>\
         <form method=\"post\" action=\"/catways/{n}/edit\">{state}\
         <p><button type=\"submit\">Save</button> <a href=\"/catways\">Cancel</a></p></form>",
        n = berth.catway_number,
        kind = berth.catway_type,
        state = input("State", "catwayState", "text", state_value),
    );
    page("Edit catway", Some(session), &error_flash(error), &body)
}

/// `/reservations`
pub fn reservation_list(
    session: &Session,
    flash: &Flash,
    reservations: &[Reservation],
) -> Html<String> {
    let body = format!(
        "<p><a href=\"/reservations/add\">New reservation</a></p>\
         <table>{}<th></th></tr>{}</table>",
        RESERVATION_HEAD,
        reservation_rows(reservations, true)
    );
    page("Reservations", Some(session), flash, &body)
}

fn reservation_fields(form: &ReservationForm) -> String {
    format!(
        "{}{}{}{}",
        input("Client", "clientName", "text", form.client_name.as_deref().unwrap_or("")),
        input("Boat", "boatName", "text", form.boat_name.as_deref().unwrap_or("")),
        input("Start", "startDate", "date", form.start_date.as_deref().unwrap_or("")),
        input("End", "endDate", "date", form.end_date.as_deref().unwrap_or("")),
    )
}

/// `/reservations/add`
pub fn reservation_add_form(
    session: &Session,
    berths: &[Berth],
    form: &ReservationForm,
    error: Option<&str>,
) -> Html<String> {
    let chosen = form.catway_number.as_deref().unwrap_or("");
    let mut options = String::new();
    for b in berths {
        let value = b.catway_number.to_string();
        let selected = if value == chosen { " selected" } else { "" };
        let _ = write!(
            options,
            "<option value=\"{v}\"{sel}>{v} ({kind}, {state})</option>",
            v = value,
            sel = selected,
            kind = b.catway_type,
            state = escape(&b.catway_state),
        );
    }
    let body = format!(
        "<form method=\"post\" action=\"/reservations/add\">\
         <label>Catway<br><select name=\"catwayNumber\">{}</select></label>{}\
         <p><button type=\"submit\">Book</button> <a href=\"/reservations\">Cancel</a></p></form>",
        options,
        reservation_fields(form),
    );
    page("New reservation", Some(session), &error_flash(error), &body)
}

/// `/reservations/{id}/edit` - the catway is fixed
pub fn reservation_edit_form(
    session: &Session,
    reservation: &Reservation,
    form: &ReservationForm,
    error: Option<&str>,
) -> Html<String> {
    let body = format!(
        "<p>Catway {}</p><form method=\"post\" action=\"/reservations/{}/edit\">{}\
         <p><button type=\"submit\">Save</button> <a href=\"/reservations\">Cancel</a></p></form>",
        reservation.catway_number,
        reservation.id,
        reservation_fields(form),
    );
    page("Edit reservation", Some(session), &error_flash(error), &body)
}

/// `/users`
pub fn user_list(session: &Session, flash: &Flash, users: &[User]) -> Html<String> {
    let mut rows = String::new();
    for u in users {
        let email = urlencoding::encode(&u.email);
        // No delete button on the caller's own row
        let delete = if u.email == session.email {
            String::new()
        } else {
            post_button(&format!("/users/{}/delete", email), "Delete")
        };
        let _ = write!(
            rows,
            "<tr><td>{}</td><td>{}</td><td><a href=\"/users/{}/edit\">Edit</a> {}</td></tr>",
            escape(&u.username),
            escape(&u.email),
            escape(&email),
            delete,
        );
    }
    let body = format!(
        "<p><a href=\"/users/add\">Add a user</a></p>\
         <table><tr><th>Username</th><th>Email</th><th></th></tr>{}</table>",
        rows
    );
    page("Users", Some(session), flash, &body)
}

fn user_fields(form: &UserForm, password_hint: &str) -> String {
    format!(
        "{}{}{}{}",
        input("Username", "username", "text", form.username.as_deref().unwrap_or("")),
        input("Email", "email", "email", form.email.as_deref().unwrap_or("")),
        input(&format!("Password{}", password_hint), "password", "password", ""),
        input("Confirm password", "confirmPassword", "password", ""),
    )
}

/// `/users/add`
pub fn user_add_form(session: &Session, form: &UserForm, error: Option<&str>) -> Html<String> {
    let body = format!(
        "<form method=\"post\" action=\"/users/add\">{}\
         <p><button type=\"submit\">Create</button> <a href=\"/users\">Cancel</a></p></form>",
        user_fields(form, ""),
    );
    page("New user", Some(session), &error_flash(error), &body)
}

/// `/users/{email}/edit`
pub fn user_edit_form(
    session: &Session,
    email_key: &str,
    form: &UserForm,
    error: Option<&str>,
) -> Html<String> {
    let body = format!(
        "<form method=\"post\" action=\"/users/{}/edit\">{}\
         <p><button type=\"submit\">Save</button> <a href=\"/users\">Cancel</a></p></form>",
        escape(&urlencoding::encode(email_key)),
        user_fields(form, " (leave blank to keep)"),
    );
    page("Edit user", Some(session), &error_flash(error), &body)
}
