use rocket::{Request, catch, http::Status, response::status};
use rocket_dyn_templates::Template;
use crate::pages::ErrorPage;

#[catch(404)]
pub fn not_found(req: &Request) -> status::NotFound<Template> {
    status::NotFound(Template::render("error", ErrorPage::new(
        Status::NotFound,
        format!("Nothing lives at {}.", req.uri().path()),
    )))
}

#[catch(500)]
pub fn internal_error(_req: &Request) -> status::Custom<Template> {
    status::Custom(Status::InternalServerError, Template::render("error", ErrorPage::new(
        Status::InternalServerError,
        "Something broke on our side. Please try again later.",
    )))
}

#[catch(default)]
pub fn default(status: Status, _req: &Request) -> status::Custom<Template> {
    status::Custom(status, Template::render("error", ErrorPage::new(
        status,
        "The request could not be handled.",
    )))
}
