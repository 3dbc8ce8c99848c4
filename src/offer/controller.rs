use std::sync::Arc;

use tracing::info;

use super::{City, CreateOfferDto, OfferRdo, OfferService, UpdateOfferDto};
use crate::comment::{CommentRdo, CommentService};
use crate::failure::{AppError, HttpError};
use crate::handler::bind;
use crate::middleware::{ValidateBody, ValidateObjectId};
use crate::request::Request;
use crate::response::Response;
use crate::router::{Controller, Route};
use crate::status::Status;

const COMPONENT: &str = "OfferController";
const OFFER_ID: &str = "offerId";

/// `/offers`: CRUD over offers plus the premium, favorites and comments views.
pub struct OfferController {
    offers: Arc<dyn OfferService>,
    comments: Arc<dyn CommentService>,
}

impl OfferController {
    pub fn new(offers: Arc<dyn OfferService>, comments: Arc<dyn CommentService>) -> Arc<Self> {
        info!("Register routes for OfferController...");
        Arc::new(Self { offers, comments })
    }

    async fn create(self: Arc<Self>, mut req: Request) -> Result<Response, AppError> {
        let dto = req.take_dto::<CreateOfferDto>()?;
        let offer = self.offers.create(dto).await?;
        Response::created_as::<OfferRdo, _>(&offer)
    }

    async fn update(self: Arc<Self>, mut req: Request) -> Result<Response, AppError> {
        let dto = req.take_dto::<UpdateOfferDto>()?;
        let id = offer_id(&req);
        let offer = self
            .offers
            .update_by_id(id, dto)
            .await?
            .ok_or_else(|| not_found(id))?;
        Response::ok_as::<OfferRdo, _>(&offer)
    }

    async fn delete(self: Arc<Self>, req: Request) -> Result<Response, AppError> {
        let id = offer_id(&req);
        if self.offers.delete_by_id(id).await?.is_none() {
            return Err(not_found(id).into());
        }
        self.comments.delete_by_offer_id(id).await?;
        Ok(Response::no_content())
    }

    async fn show(self: Arc<Self>, req: Request) -> Result<Response, AppError> {
        let id = offer_id(&req);
        let offer = self.offers.find_by_id(id).await?.ok_or_else(|| not_found(id))?;
        Response::ok_as::<OfferRdo, _>(&offer)
    }

    async fn index(self: Arc<Self>, req: Request) -> Result<Response, AppError> {
        let offers = self.offers.find(limit(&req)).await?;
        Response::ok_as::<OfferRdo, _>(&offers)
    }

    async fn premium(self: Arc<Self>, req: Request) -> Result<Response, AppError> {
        let name = req.param("city").unwrap_or_default();
        let city = City::parse(name).ok_or_else(|| {
            HttpError::new(
                Status::NotFound,
                format!("The specified city «{}» is not found.", capitalize(name)),
                COMPONENT,
            )
        })?;
        let offers = self.offers.find_premium(city).await?;
        Response::ok_as::<OfferRdo, _>(&offers)
    }

    async fn favorites(self: Arc<Self>, _req: Request) -> Result<Response, AppError> {
        Err(not_implemented().into())
    }

    async fn update_favorite(self: Arc<Self>, _req: Request) -> Result<Response, AppError> {
        Err(not_implemented().into())
    }

    async fn comments(self: Arc<Self>, req: Request) -> Result<Response, AppError> {
        let id = offer_id(&req);
        if !self.offers.exists(id).await? {
            return Err(not_found(id).into());
        }
        let comments = self.comments.find_by_offer_id(id, limit(&req)).await?;
        Response::ok_as::<CommentRdo, _>(&comments)
    }
}

impl Controller for OfferController {
    fn prefix(&self) -> &str {
        "/offers"
    }

    fn register_routes(self: Arc<Self>) -> Vec<Route> {
        vec![
            Route::post("/", bind(&self, Self::create))
                .with(ValidateBody::<CreateOfferDto>::new()),
            Route::patch("/:offerId", bind(&self, Self::update))
                .with(ValidateObjectId::new(OFFER_ID))
                .with(ValidateBody::<UpdateOfferDto>::new()),
            Route::delete("/:offerId", bind(&self, Self::delete))
                .with(ValidateObjectId::new(OFFER_ID)),
            Route::get("/:offerId", bind(&self, Self::show))
                .with(ValidateObjectId::new(OFFER_ID)),
            Route::get("/", bind(&self, Self::index)),
            Route::get("/premium/:city", bind(&self, Self::premium)),
            Route::get("/favorites", bind(&self, Self::favorites)),
            Route::get("/:offerId/favorite", bind(&self, Self::update_favorite))
                .with(ValidateObjectId::new(OFFER_ID)),
            Route::get("/:offerId/comments", bind(&self, Self::comments))
                .with(ValidateObjectId::new(OFFER_ID)),
        ]
    }
}

fn offer_id(req: &Request) -> &str {
    req.param(OFFER_ID).unwrap_or_default()
}

fn not_found(id: &str) -> HttpError {
    HttpError::new(
        Status::NotFound,
        format!("Offer with the specified id «{id}» is not found."),
        COMPONENT,
    )
}

fn not_implemented() -> HttpError {
    HttpError::new(Status::NotImplemented, "Not implemented.", COMPONENT)
}

/// `?limit=` as a non-negative integer; anything else means "no limit".
fn limit(req: &Request) -> Option<usize> {
    req.query("limit")?.parse().ok()
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
