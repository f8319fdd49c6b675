//! Server-rendered HTML pages.
//!
//! ```text
//! GET  /       registration form
//! POST /lista  register the submitted user, then list every user
//! ```
//!
//! Templates are compiled into the binary. Any failure while serving a page
//! is logged and answered with a plain error page and status 500.

use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tera::{Context, Tera};

use super::error::with_deadline;
use super::state::HttpState;
use crate::domain::{Error, PlainPassword, UserCreate, UserFilter};
use crate::logging::log_error;

/// Body of the error page.
pub const ERR_LOADING_PAGE: &str = "Errore durante il caricamento della pagina";

const TEMPLATES: [(&str, &str); 3] = [
    ("base.html", include_str!("../../../templates/base.html")),
    ("index.html", include_str!("../../../templates/index.html")),
    ("list.html", include_str!("../../../templates/list.html")),
];

#[derive(Serialize)]
struct HeadData<'a> {
    title: &'a str,
    app_name: &'a str,
    no_index: bool,
}

/// Compiled page templates plus the values shared by every page head.
pub struct PageRenderer {
    tera: Tera,
    app_name: String,
}

impl PageRenderer {
    /// Compile the embedded templates.
    ///
    /// # Errors
    ///
    /// Returns an `internal` error when a template does not parse.
    pub fn new(app_name: impl Into<String>) -> Result<Self, Error> {
        let mut tera = Tera::default();
        tera.add_raw_templates(TEMPLATES)
            .map_err(|err| Error::internal(format!("Error parsing templates: {err}")))?;
        Ok(Self {
            tera,
            app_name: app_name.into(),
        })
    }

    fn render(&self, template: &str, title: &str, mut context: Context) -> Result<String, Error> {
        context.insert(
            "head",
            &HeadData {
                title,
                app_name: &self.app_name,
                no_index: false,
            },
        );
        self.tera
            .render(template, &context)
            .map_err(|err| Error::internal(format!("Error rendering {template}: {err}")))
    }
}

/// Fields posted by the registration form. Missing fields decode as empty
/// so validation, not the extractor, reports them.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RegistrationForm {
    pub name: String,
    pub surname: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

impl TryFrom<RegistrationForm> for UserCreate {
    type Error = Error;

    fn try_from(form: RegistrationForm) -> Result<Self, Self::Error> {
        let phone = form
            .phone
            .trim()
            .parse()
            .map_err(|err| Error::invalid(format!("Phone is invalid: {err}")))?;
        Ok(Self {
            name: form.name,
            surname: form.surname,
            email: form.email,
            password: PlainPassword::new(form.password),
            phone,
        })
    }
}

#[get("/")]
pub async fn index_page(pages: web::Data<PageRenderer>) -> HttpResponse {
    respond(pages.render("index.html", "Registrazione", Context::new()))
}

#[post("/lista")]
pub async fn list_page(
    state: web::Data<HttpState>,
    pages: web::Data<PageRenderer>,
    form: web::Form<RegistrationForm>,
) -> HttpResponse {
    respond(register_and_list(&state, &pages, form.into_inner()).await)
}

async fn register_and_list(
    state: &HttpState,
    pages: &PageRenderer,
    form: RegistrationForm,
) -> Result<String, Error> {
    let input = UserCreate::try_from(form)?;
    with_deadline(state.request_timeout, state.users.create(input)).await?;
    let users = with_deadline(
        state.request_timeout,
        state.users.find_many(UserFilter::default()),
    )
    .await?;

    let mut context = Context::new();
    context.insert("users", &users.items);
    pages.render("list.html", "Utenti", context)
}

fn respond(result: Result<String, Error>) -> HttpResponse {
    match result {
        Ok(body) => HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(body),
        Err(err) => {
            log_error(&err);
            error_page()
        }
    }
}

/// Generic page shown when a page cannot be produced.
pub fn error_page() -> HttpResponse {
    HttpResponse::InternalServerError()
        .content_type(ContentType::html())
        .body(ERR_LOADING_PAGE)
}

/// Register the page routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index_page).service(list_page);
}
