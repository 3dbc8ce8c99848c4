//! The offers service with in-memory collaborators.
//!
//! Run with:
//!   SALT=dev-salt cargo run --example offers
//!
//! Try:
//!   curl http://localhost:4000/offers?limit=2
//!   curl http://localhost:4000/offers/premium/amsterdam
//!   curl -X DELETE http://localhost:4000/offers/0000000000000000000000ff
//!   curl http://localhost:4000/users/login -H 'authorization: Bearer demo-token'
//!   curl http://localhost:4000/healthz

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use sluice::comment::{Comment, CommentService};
use sluice::middleware::{Authenticate, TokenVerifier};
use sluice::offer::{City, CreateOfferDto, Offer, OfferController, OfferService, UpdateOfferDto};
use sluice::user::{CreateUserDto, User, UserController, UserService, UserType};
use sluice::{Config, Identity, Route, Router, Server, health, logger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logger::init(&config.log_level)?;

    let ids = Arc::new(Ids::default());
    let users = Arc::new(MemoryUsers { ids: Arc::clone(&ids), users: RwLock::default() });
    let demo = users
        .find_or_create(
            CreateUserDto {
                name: "Demo".into(),
                email: "demo@example.com".into(),
                avatar: None,
                password: "secret1".into(),
                user_type: UserType::Pro,
            },
            &config.salt,
        )
        .await?;

    let offers = Arc::new(MemoryOffers { ids, users: Arc::clone(&users), offers: RwLock::default() });
    let comments = Arc::new(MemoryComments::default());

    let app = Router::new()
        .global(Authenticate::new(Arc::new(StaticToken(Identity { id: demo.id, email: demo.email }))))
        .mount(OfferController::new(offers, comments))?
        .mount(UserController::new(users, config.salt.clone()))?
        .route(Route::get("/healthz", health::liveness))?
        .route(Route::get("/readyz", health::readiness))?;

    Server::from_addr(config.addr()?).serve(app).await?;
    Ok(())
}

// ── Collaborators ─────────────────────────────────────────────────────────────

/// 24-hex-digit ids, so they pass the id-format check.
#[derive(Default)]
struct Ids(AtomicU64);

impl Ids {
    fn next(&self) -> String {
        format!("{:024x}", self.0.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

struct StaticToken(Identity);

#[async_trait]
impl TokenVerifier for StaticToken {
    async fn verify(&self, token: &str) -> Option<Identity> {
        (token == "demo-token").then(|| self.0.clone())
    }
}

struct MemoryUsers {
    ids: Arc<Ids>,
    users: RwLock<Vec<User>>,
}

impl MemoryUsers {
    async fn find_by_id(&self, id: &str) -> Option<User> {
        self.users.read().await.iter().find(|u| u.id == id).cloned()
    }
}

#[async_trait]
impl UserService for MemoryUsers {
    async fn create(&self, dto: CreateUserDto, salt: &str) -> anyhow::Result<User> {
        let password = hex::encode(Sha256::digest(format!("{}{salt}", dto.password)));
        let user = User {
            id: self.ids.next(),
            name: dto.name,
            email: dto.email,
            avatar: dto.avatar,
            user_type: dto.user_type,
            password,
        };
        self.users.write().await.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.email == email).cloned())
    }

    async fn find_or_create(&self, dto: CreateUserDto, salt: &str) -> anyhow::Result<User> {
        match self.find_by_email(&dto.email).await? {
            Some(user) => Ok(user),
            None => self.create(dto, salt).await,
        }
    }
}

struct MemoryOffers {
    ids: Arc<Ids>,
    users: Arc<MemoryUsers>,
    offers: RwLock<Vec<Offer>>,
}

#[async_trait]
impl OfferService for MemoryOffers {
    async fn create(&self, dto: CreateOfferDto) -> anyhow::Result<Offer> {
        let city = dto.city().ok_or_else(|| anyhow::anyhow!("unknown city `{}`", dto.city))?;
        let author = self
            .users
            .find_by_id(&dto.author_id)
            .await
            .ok_or_else(|| anyhow::anyhow!("author `{}` does not exist", dto.author_id))?;

        let offer = Offer {
            id: self.ids.next(),
            title: dto.title,
            description: dto.description,
            city,
            preview_image: dto.preview_image,
            images: dto.images,
            is_premium: dto.is_premium,
            is_favorite: false,
            rating: dto.rating,
            housing_type: dto.housing_type,
            room_count: dto.room_count,
            guest_count: dto.guest_count,
            price: dto.price,
            amenities: dto.amenities,
            author,
            comment_count: 0,
            location: city.location(),
        };
        self.offers.write().await.push(offer.clone());
        Ok(offer)
    }

    async fn find_by_id(&self, id: &str) -> anyhow::Result<Option<Offer>> {
        Ok(self.offers.read().await.iter().find(|o| o.id == id).cloned())
    }

    async fn find(&self, limit: Option<usize>) -> anyhow::Result<Vec<Offer>> {
        let offers = self.offers.read().await;
        Ok(offers.iter().take(limit.unwrap_or(usize::MAX)).cloned().collect())
    }

    async fn update_by_id(&self, id: &str, dto: UpdateOfferDto) -> anyhow::Result<Option<Offer>> {
        let mut offers = self.offers.write().await;
        let Some(offer) = offers.iter_mut().find(|o| o.id == id) else {
            return Ok(None);
        };

        if let Some(city) = dto.city() {
            offer.city = city;
            offer.location = city.location();
        }
        if let Some(v) = dto.title { offer.title = v; }
        if let Some(v) = dto.description { offer.description = v; }
        if let Some(v) = dto.preview_image { offer.preview_image = v; }
        if let Some(v) = dto.images { offer.images = v; }
        if let Some(v) = dto.is_premium { offer.is_premium = v; }
        if let Some(v) = dto.rating { offer.rating = v; }
        if let Some(v) = dto.housing_type { offer.housing_type = v; }
        if let Some(v) = dto.room_count { offer.room_count = v; }
        if let Some(v) = dto.guest_count { offer.guest_count = v; }
        if let Some(v) = dto.price { offer.price = v; }
        if let Some(v) = dto.amenities { offer.amenities = v; }

        Ok(Some(offer.clone()))
    }

    async fn delete_by_id(&self, id: &str) -> anyhow::Result<Option<Offer>> {
        let mut offers = self.offers.write().await;
        Ok(offers.iter().position(|o| o.id == id).map(|i| offers.remove(i)))
    }

    async fn exists(&self, id: &str) -> anyhow::Result<bool> {
        Ok(self.offers.read().await.iter().any(|o| o.id == id))
    }

    async fn find_premium(&self, city: City) -> anyhow::Result<Vec<Offer>> {
        let offers = self.offers.read().await;
        Ok(offers.iter().filter(|o| o.is_premium && o.city == city).cloned().collect())
    }
}

#[derive(Default)]
struct MemoryComments {
    comments: RwLock<Vec<Comment>>,
}

#[async_trait]
impl CommentService for MemoryComments {
    async fn find_by_offer_id(&self, offer_id: &str, limit: Option<usize>) -> anyhow::Result<Vec<Comment>> {
        let comments = self.comments.read().await;
        Ok(comments
            .iter()
            .filter(|c| c.offer_id == offer_id)
            .take(limit.unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn delete_by_offer_id(&self, offer_id: &str) -> anyhow::Result<u64> {
        let mut comments = self.comments.write().await;
        let before = comments.len();
        comments.retain(|c| c.offer_id != offer_id);
        Ok((before - comments.len()) as u64)
    }
}
