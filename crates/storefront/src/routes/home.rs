//! Home page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::flash::{Flash, take_flash};
use crate::middleware::OptionalUser;
use crate::routes::catalog::ProductCardView;
use crate::state::AppState;

/// Number of products featured on the home page.
const FEATURED_COUNT: usize = 8;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub featured: Vec<ProductCardView>,
    pub user_name: String,
    pub flash: Option<Flash>,
}

/// Display the home page.
///
/// A backend outage degrades to an empty shelf rather than an error
/// page; the header and navigation stay usable.
#[instrument(skip(state, session, user))]
pub async fn home(
    State(state): State<AppState>,
    session: Session,
    OptionalUser(user): OptionalUser,
) -> impl IntoResponse {
    let featured = match state.api().list_products().await {
        Ok(mut products) => {
            products.retain(|p| p.active);
            // Newest first, same proxy the catalog uses
            products.sort_by(|a, b| b.id.cmp(&a.id));
            products
                .iter()
                .take(FEATURED_COUNT)
                .map(ProductCardView::from)
                .collect()
        }
        Err(e) => {
            tracing::warn!("Failed to fetch featured products: {e}");
            Vec::new()
        }
    };

    HomeTemplate {
        featured,
        user_name: user.map(|u| u.name).unwrap_or_default(),
        flash: take_flash(&session).await,
    }
}
