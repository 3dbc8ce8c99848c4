//! Shared fixtures: in-memory collaborators that count calls, request
//! builders, and a log recorder.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use http::Method;
use serde_json::Value;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

use sluice::comment::{Comment, CommentService};
use sluice::middleware::TokenVerifier;
use sluice::offer::{City, CreateOfferDto, HousingType, Location, Offer, OfferService, UpdateOfferDto};
use sluice::user::{CreateUserDto, User, UserService, UserType};
use sluice::{Identity, Request, Response};

pub const OFFER_ID: &str = "00000000000000000000000a";
pub const MISSING_ID: &str = "0000000000000000000000ff";
pub const TOKEN: &str = "t0k3n";

// ── Requests ──────────────────────────────────────────────────────────────────

pub fn request(method: Method, uri: &str) -> Request {
    http::Request::builder().method(method).uri(uri).body(Bytes::new()).unwrap().into()
}

pub fn json_request(method: Method, uri: &str, body: &Value) -> Request {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Bytes::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
        .into()
}

pub fn authorized(method: Method, uri: &str) -> Request {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {TOKEN}"))
        .body(Bytes::new())
        .unwrap()
        .into()
}

pub fn json(res: &Response) -> Value {
    serde_json::from_slice(res.body()).unwrap()
}

// ── Fixtures ──────────────────────────────────────────────────────────────────

pub fn author() -> User {
    User {
        id: "000000000000000000000001".into(),
        name: "Alice".into(),
        email: "alice@example.com".into(),
        avatar: Some("alice.png".into()),
        user_type: UserType::Pro,
        password: "5f4dcc3b5aa765d61d8327deb882cf99".into(),
    }
}

pub fn offer(id: &str, city: City, is_premium: bool) -> Offer {
    Offer {
        id: id.into(),
        title: "Canal-side loft".into(),
        description: "Bright loft a short walk from the station.".into(),
        city,
        preview_image: "preview.jpg".into(),
        images: vec!["1.jpg".into()],
        is_premium,
        is_favorite: false,
        rating: 4.5,
        housing_type: HousingType::Apartment,
        room_count: 2,
        guest_count: 3,
        price: 900,
        amenities: vec!["Wi-Fi".into()],
        author: author(),
        comment_count: 1,
        location: Location { latitude: 52.370216, longitude: 4.895168 },
    }
}

pub fn comment(offer_id: &str) -> Comment {
    Comment {
        id: "0000000000000000000000c1".into(),
        text: "Lovely place, would stay again.".into(),
        rating: 5,
        offer_id: offer_id.into(),
        author: author(),
    }
}

// ── Collaborators ─────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct Calls(AtomicUsize);

impl Calls {
    pub fn hit(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
pub struct FakeOffers {
    pub offers: Mutex<Vec<Offer>>,
    pub created: Calls,
    pub deleted: Calls,
    pub last_limit: Mutex<Option<Option<usize>>>,
}

impl FakeOffers {
    pub fn with(offers: Vec<Offer>) -> Arc<Self> {
        Arc::new(Self { offers: Mutex::new(offers), ..Default::default() })
    }

    fn by_id(&self, id: &str) -> Option<Offer> {
        self.offers.lock().unwrap().iter().find(|o| o.id == id).cloned()
    }
}

#[async_trait]
impl OfferService for FakeOffers {
    async fn create(&self, dto: CreateOfferDto) -> anyhow::Result<Offer> {
        self.created.hit();
        let mut created = offer("0000000000000000000000b1", dto.city().unwrap_or(City::Paris), dto.is_premium);
        created.title = dto.title;
        created.price = dto.price;
        self.offers.lock().unwrap().push(created.clone());
        Ok(created)
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Offer>> {
        Ok(self.by_id(id))
    }

    async fn find(&self, limit: Option<usize>) -> anyhow::Result<Vec<Offer>> {
        *self.last_limit.lock().unwrap() = Some(limit);
        let offers = self.offers.lock().unwrap();
        Ok(offers.iter().take(limit.unwrap_or(usize::MAX)).cloned().collect())
    }

    async fn update_by_id(&self, id: &str, dto: UpdateOfferDto) -> anyhow::Result<Option<Offer>> {
        let mut offers = self.offers.lock().unwrap();
        Ok(offers.iter_mut().find(|o| o.id == id).map(|o| {
            if let Some(price) = dto.price {
                o.price = price;
            }
            o.clone()
        }))
    }

    async fn delete_by_id(&self, id: &str) -> anyhow::Result<Option<Offer>> {
        self.deleted.hit();
        let mut offers = self.offers.lock().unwrap();
        Ok(offers.iter().position(|o| o.id == id).map(|i| offers.remove(i)))
    }

    async fn exists(&self, id: &str) -> anyhow::Result<bool> {
        Ok(self.by_id(id).is_some())
    }

    async fn find_premium(&self, city: City) -> anyhow::Result<Vec<Offer>> {
        let offers = self.offers.lock().unwrap();
        Ok(offers.iter().filter(|o| o.is_premium && o.city == city).cloned().collect())
    }
}

#[derive(Default)]
pub struct FakeComments {
    pub comments: Mutex<Vec<Comment>>,
    pub deleted_for: Mutex<Vec<String>>,
}

impl FakeComments {
    pub fn with(comments: Vec<Comment>) -> Arc<Self> {
        Arc::new(Self { comments: Mutex::new(comments), ..Default::default() })
    }
}

#[async_trait]
impl CommentService for FakeComments {
    async fn find_by_offer_id(&self, offer_id: &str, limit: Option<usize>) -> anyhow::Result<Vec<Comment>> {
        let comments = self.comments.lock().unwrap();
        Ok(comments
            .iter()
            .filter(|c| c.offer_id == offer_id)
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn delete_by_offer_id(&self, offer_id: &str) -> anyhow::Result<u64> {
        self.deleted_for.lock().unwrap().push(offer_id.to_owned());
        let mut comments = self.comments.lock().unwrap();
        let before = comments.len();
        comments.retain(|c| c.offer_id != offer_id);
        Ok((before - comments.len()) as u64)
    }
}

#[derive(Default)]
pub struct FakeUsers {
    pub users: Mutex<Vec<User>>,
    pub created: Calls,
}

impl FakeUsers {
    pub fn with(users: Vec<User>) -> Arc<Self> {
        Arc::new(Self { users: Mutex::new(users), ..Default::default() })
    }
}

#[async_trait]
impl UserService for FakeUsers {
    async fn create(&self, dto: CreateUserDto, salt: &str) -> anyhow::Result<User> {
        self.created.hit();
        let user = User {
            id: "000000000000000000000002".into(),
            name: dto.name,
            email: dto.email,
            avatar: dto.avatar,
            user_type: dto.user_type,
            password: format!("{}:{salt}", dto.password),
        };
        self.users.lock().unwrap().push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_or_create(&self, dto: CreateUserDto, salt: &str) -> anyhow::Result<User> {
        match self.find_by_email(&dto.email).await? {
            Some(user) => Ok(user),
            None => self.create(dto, salt).await,
        }
    }
}

/// Accepts only [`TOKEN`], resolving it to `email`.
pub struct FixedToken {
    pub email: String,
}

#[async_trait]
impl TokenVerifier for FixedToken {
    async fn verify(&self, token: &str) -> Option<Identity> {
        (token == TOKEN).then(|| Identity { id: "000000000000000000000001".into(), email: self.email.clone() })
    }
}

// ── Logs ──────────────────────────────────────────────────────────────────────

/// Events recorded while a [`LogCapture`] guard is alive on this thread.
#[derive(Clone, Default)]
pub struct Logs(Arc<Mutex<Vec<(Level, String)>>>);

impl Logs {
    pub fn at(&self, level: Level) -> Vec<String> {
        self.0
            .lock()
            .unwrap()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }
}

struct Recorder(Logs);

impl<S: Subscriber> Layer<S> for Recorder {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut message = Message::default();
        event.record(&mut message);
        (self.0).0.lock().unwrap().push((*event.metadata().level(), message.0));
    }
}

#[derive(Default)]
struct Message(String);

impl Visit for Message {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{value:?}");
        }
    }
}

/// Installs a recording subscriber for the current thread. Tests run on the
/// current-thread runtime, so every pipeline stage logs into it.
pub fn capture_logs() -> (Logs, tracing::subscriber::DefaultGuard) {
    let logs = Logs::default();
    let subscriber = tracing_subscriber::registry().with(Recorder(logs.clone()));
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}
