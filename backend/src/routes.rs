use std::sync::Arc;
use rocket::{State, get, post, put, patch, delete, options, routes, Route, Responder};
use rocket::form::Form;
use rocket::http::{Cookie, CookieJar, Status, uri::Origin};
use rocket::response::Redirect;
use rocket_dyn_templates::Template;
use sqlx::PgPool;
use tracing::{debug, instrument, warn};
use shared::{models::*, validation::is_valid_slug, voter::VoterInfo};
use crate::{
    canonical::{resolve_talk_location, TalkLocation},
    config::SiteConfig,
    error::ApiError,
    mail::{MailCollector, MailchimpCollector, PgMailCollector},
    pages::*,
    pg::PgContentStore,
    store::ContentStore,
    subscription::{subscribe_mail, SubscribeForm},
    voting::{VoteProcessor, VoteRejection, VOTE_COOKIE, VOTE_COOKIE_VALUE},
};

pub struct AppState {
    pub store: Arc<dyn ContentStore>,
    pub mail: Arc<dyn MailCollector>,
    pub config: SiteConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn ContentStore>, mail: Arc<dyn MailCollector>, config: SiteConfig) -> Self {
        Self { store, mail, config }
    }

    /// Postgres-backed state. Subscribers go to Mailchimp when it is configured,
    /// otherwise to the local `subscribers` table.
    pub fn with_postgres(pool: PgPool, config: SiteConfig) -> Self {
        let mail: Arc<dyn MailCollector> = match &config.mailchimp {
            Some(settings) => match MailchimpCollector::new(settings.api_key.clone(), &settings.list_id) {
                Ok(collector) => Arc::new(collector),
                Err(e) => {
                    warn!("Mailchimp disabled ({}) - storing subscribers locally", e);
                    Arc::new(PgMailCollector::new(pool.clone()))
                }
            },
            None => {
                warn!("MAILCHIMP_API_KEY not found - storing subscribers locally");
                Arc::new(PgMailCollector::new(pool.clone()))
            }
        };

        Self::new(Arc::new(PgContentStore::new(pool)), mail, config)
    }

    fn store(&self) -> &dyn ContentStore {
        self.store.as_ref()
    }
}

#[derive(Responder)]
pub enum TalkResponse {
    Page(Template),
    Moved(Redirect),
}

pub fn all() -> Vec<Route> {
    routes![
        index,
        events,
        event,
        talk,
        legacy_talk,
        talk_by_id,
        speakers,
        speaker,
        tutorials,
        tutorial,
        about,
        live,
        vote_results,
        subscribe,
        vote,
        vote_get,
        vote_put,
        vote_patch,
        vote_delete,
        vote_options,
    ]
}

#[instrument(skip(state))]
#[get("/")]
pub async fn index(state: &State<AppState>) -> Result<Template, ApiError> {
    let store = state.store();
    let speakers = Speakers::load(store).await?;

    let mut events = Vec::new();
    for event in store.archived_events().await? {
        events.push(speakers.event_with_talks(store, event).await?);
    }

    let main_event = match store.latest_visible_event().await? {
        Some(event) => Some(speakers.event_with_talks(store, event).await?),
        None => None,
    };

    Ok(Template::render("index", IndexPage { title: "Moscow Django", events, main_event }))
}

#[instrument(skip(state))]
#[get("/meetups")]
pub async fn events(state: &State<AppState>) -> Result<Template, ApiError> {
    let events = state.store().visible_events().await?
        .into_iter()
        .map(|event| event_card(event, Vec::new()))
        .collect();

    Ok(Template::render("event_list", EventListPage { title: "Meetups", events }))
}

#[instrument(skip(state))]
#[get("/meetups/<event_id>")]
pub async fn event(state: &State<AppState>, event_id: i32) -> Result<Template, ApiError> {
    let store = state.store();
    let event = store.visible_event(event_id).await?.ok_or(ApiError::NotFound)?;
    let photos = store.event_photos(event.id).await?;
    let speakers = Speakers::load(store).await?;
    let event = speakers.event_with_talks(store, event).await?;

    Ok(Template::render("event", EventPage { title: event.name.clone(), event, photos }))
}

async fn render_talk(state: &AppState, talk: Talk, origin: &Origin<'_>) -> Result<TalkResponse, ApiError> {
    if let TalkLocation::Moved(canonical) = resolve_talk_location(&talk, origin.path().as_str()) {
        debug!("Redirecting {} to {}", origin.path(), canonical);
        return Ok(TalkResponse::Moved(Redirect::moved(canonical)));
    }

    let store = state.store();
    let event = store.event(talk.event_id).await?.ok_or(ApiError::NotFound)?;
    let speakers = Speakers::load(store).await?;
    let talk = speakers.talk_card(talk);
    let event = event_card(event, Vec::new());

    Ok(TalkResponse::Page(Template::render("talk", TalkPage { title: talk.name.clone(), talk, event })))
}

async fn find_talk(state: &AppState, event_id: i32, talk_slug: &str) -> Result<Talk, ApiError> {
    if !is_valid_slug(talk_slug) {
        return Err(ApiError::NotFound);
    }
    state.store().active_talk(event_id, talk_slug).await?.ok_or(ApiError::NotFound)
}

#[instrument(skip(state, origin))]
#[get("/meetups/<event_id>/<talk_slug>")]
pub async fn talk(
    state: &State<AppState>,
    event_id: i32,
    talk_slug: &str,
    origin: &Origin<'_>,
) -> Result<TalkResponse, ApiError> {
    let talk = find_talk(state, event_id, talk_slug).await?;
    render_talk(state, talk, origin).await
}

#[instrument(skip(state, origin))]
#[get("/meetup/<event_id>/<talk_slug>")]
pub async fn legacy_talk(
    state: &State<AppState>,
    event_id: i32,
    talk_slug: &str,
    origin: &Origin<'_>,
) -> Result<TalkResponse, ApiError> {
    let talk = find_talk(state, event_id, talk_slug).await?;
    render_talk(state, talk, origin).await
}

#[instrument(skip(state, origin))]
#[get("/talk/<talk_id>")]
pub async fn talk_by_id(
    state: &State<AppState>,
    talk_id: i32,
    origin: &Origin<'_>,
) -> Result<TalkResponse, ApiError> {
    let talk = state.store().talk(talk_id).await?
        .filter(Talk::is_active)
        .ok_or(ApiError::NotFound)?;
    render_talk(state, talk, origin).await
}

#[instrument(skip(state))]
#[get("/speakers")]
pub async fn speakers(state: &State<AppState>) -> Result<Template, ApiError> {
    let speakers = state.store().speakers().await?
        .into_iter()
        .map(SpeakerCard::from)
        .collect();

    Ok(Template::render("speaker_list", SpeakerListPage { title: "Speakers", speakers }))
}

#[instrument(skip(state))]
#[get("/speakers/<speaker_id>")]
pub async fn speaker(state: &State<AppState>, speaker_id: i32) -> Result<Template, ApiError> {
    let store = state.store();
    let speaker = store.speaker(speaker_id).await?.ok_or(ApiError::NotFound)?;
    let speakers = Speakers::load(store).await?;
    let talks = store.speaker_talks(speaker.id).await?
        .into_iter()
        .map(|talk| speakers.talk_card(talk))
        .collect();
    let speaker = SpeakerCard::from(speaker);

    Ok(Template::render("speaker", SpeakerPage { title: speaker.name.clone(), speaker, talks }))
}

#[instrument(skip(state))]
#[get("/tutorials")]
pub async fn tutorials(state: &State<AppState>) -> Result<Template, ApiError> {
    let tutorials = state.store().tutorials().await?
        .into_iter()
        .map(TutorialCard::from)
        .collect();

    Ok(Template::render("tutorial_list", TutorialListPage { title: "Tutorials", tutorials }))
}

#[instrument(skip(state))]
#[get("/tutorials/<tutorial_id>")]
pub async fn tutorial(state: &State<AppState>, tutorial_id: i32) -> Result<Template, ApiError> {
    let tutorial = state.store().tutorial(tutorial_id).await?.ok_or(ApiError::NotFound)?;
    let tutorial = TutorialCard::from(tutorial);

    Ok(Template::render("tutorial", TutorialPage { title: tutorial.title.clone(), tutorial }))
}

#[instrument(skip(state))]
#[get("/about")]
pub async fn about(state: &State<AppState>) -> Result<Template, ApiError> {
    let photos = state.store().recent_photos(state.config.recent_photos).await?;
    Ok(Template::render("about", AboutPage { title: "About", photos }))
}

#[instrument(skip(state))]
#[get("/live")]
pub async fn live(state: &State<AppState>) -> Result<Template, ApiError> {
    let store = state.store();
    let event = match store.spotlight_event().await? {
        Some(event) => Some(Speakers::load(store).await?.event_with_talks(store, event).await?),
        None => None,
    };

    Ok(Template::render("live", LivePage { title: "Live", event }))
}

#[instrument(skip(state))]
#[get("/vote-results")]
pub async fn vote_results(state: &State<AppState>) -> Result<Template, ApiError> {
    let store = state.store();
    let Some(event) = store.spotlight_event().await? else {
        return Ok(Template::render("vote_results", VoteResultsPage {
            title: "Vote results",
            event: None,
            results: Vec::new(),
            total: 0,
        }));
    };

    let speakers = Speakers::load(store).await?;
    let results: Vec<VoteRow> = store.vote_tally(event.id).await?
        .into_iter()
        .map(|row| VoteRow { talk: speakers.talk_card(row.talk), votes: row.votes })
        .collect();
    let total = results.iter().map(|row| row.votes).sum();

    Ok(Template::render("vote_results", VoteResultsPage {
        title: "Vote results",
        event: Some(event_card(event, Vec::new())),
        results,
        total,
    }))
}

#[instrument(skip(state, form))]
#[post("/ajax/subscribe", data = "<form>")]
pub async fn subscribe(state: &State<AppState>, form: Option<Form<SubscribeForm>>) -> &'static str {
    let email = form.and_then(|form| form.into_inner().email);
    subscribe_mail(state.mail.as_ref(), email.as_deref()).await.as_str()
}

#[instrument(skip(state, cookies, voter))]
#[post("/vote/<talk_id>")]
pub async fn vote(
    state: &State<AppState>,
    talk_id: i32,
    cookies: &CookieJar<'_>,
    voter: VoterInfo,
) -> (Status, String) {
    let already_voted = cookies.get(VOTE_COOKIE).is_some();

    match VoteProcessor::cast(state.store(), talk_id, already_voted, &voter).await {
        Ok(_) => {
            // Session cookie: no expiry, valid site-wide.
            cookies.add(Cookie::build((VOTE_COOKIE, VOTE_COOKIE_VALUE)).path("/"));
            (Status::Ok, state.config.results_path.clone())
        }
        Err(rejection) => (rejection.status(), rejection.to_string()),
    }
}

fn only_post() -> (Status, String) {
    let rejection = VoteRejection::WrongMethod;
    (rejection.status(), rejection.to_string())
}

#[get("/vote/<_>")]
pub fn vote_get() -> (Status, String) {
    only_post()
}

#[put("/vote/<_>")]
pub fn vote_put() -> (Status, String) {
    only_post()
}

#[patch("/vote/<_>")]
pub fn vote_patch() -> (Status, String) {
    only_post()
}

#[delete("/vote/<_>")]
pub fn vote_delete() -> (Status, String) {
    only_post()
}

#[options("/vote/<_>")]
pub fn vote_options() -> (Status, String) {
    only_post()
}
