use proc_macro::TokenStream;

mod args;
mod router;
mod routes;

/// Attribute macro declaring a struct as a router
///
/// Associates a `RouterSpec` with the type and generates `new(..)` taking the
/// struct's fields in order. Fields marked `#[default]` are left out of `new`
/// and start from `Default::default()`.
///
/// # Example
/// ```ignore
/// use httprouter::router;
///
/// #[router(
///     prefix = "/users",
///     tags = ["users"],
///     responses = { 404: "Not found" },
///     guards = [RequireApiKey],
/// )]
/// pub struct UserRouter {
///     repository: Arc<dyn UserRepository>,
///     #[default]
///     hits: AtomicU64,
/// }
/// ```
#[proc_macro_attribute]
pub fn router(attr: TokenStream, item: TokenStream) -> TokenStream {
    router::router_attribute(attr, item)
}

/// Attribute macro collecting the endpoints of an impl block
///
/// Implements `httprouter::Router` for the type, listing every method marked
/// `#[get]`, `#[post]`, `#[put]`, `#[patch]`, `#[delete]`, `#[route]`,
/// `#[websocket]` or `#[lifespan]` in declaration order. A method's doc comment
/// becomes the route description and its name the route name.
///
/// Handlers that extract axum state need `#[routes(state = AppState)]`.
///
/// An impl block holds at most one `#[lifespan]`; a second one is a compile
/// error.
///
/// # Example
/// ```ignore
/// #[routes]
/// impl UserRouter {
///     /// Fetch one user
///     #[get("/{id}")]
///     async fn get_user(&self, #[param] id: u64) -> Json<User> {
///         // ...
///     }
///
///     #[lifespan]
///     async fn lifespan(&self, running: Running) {
///         // ...
///     }
/// }
/// ```
#[proc_macro_attribute]
pub fn routes(attr: TokenStream, item: TokenStream) -> TokenStream {
    routes::routes_attribute(attr, item)
}

/// HTTP GET route, read by `#[routes]`
#[proc_macro_attribute]
pub fn get(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}

/// HTTP POST route, read by `#[routes]`
#[proc_macro_attribute]
pub fn post(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}

/// HTTP PUT route, read by `#[routes]`
#[proc_macro_attribute]
pub fn put(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}

/// HTTP PATCH route, read by `#[routes]`
#[proc_macro_attribute]
pub fn patch(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}

/// HTTP DELETE route, read by `#[routes]`
#[proc_macro_attribute]
pub fn delete(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}

/// Route for a method set: `#[route("/items", methods = [GET, POST])]`
#[proc_macro_attribute]
pub fn route(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}

/// WebSocket endpoint: `#[websocket("/ws", name = "feed")]`
#[proc_macro_attribute]
pub fn websocket(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}

/// The router's lifespan; code before `running.await` is setup, code after
/// is teardown
#[proc_macro_attribute]
pub fn lifespan(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}

/// Parameter attribute for request body (JSON)
/// Wraps the parameter with axum::Json extractor
#[proc_macro_attribute]
pub fn body(_attr: TokenStream, item: TokenStream) -> TokenStream {
    // Pass-through, actual handling is done by #[routes] macro
    item
}

/// Parameter attribute for path parameters
/// Wraps the parameter with axum::extract::Path extractor
#[proc_macro_attribute]
pub fn param(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}

/// Parameter attribute for query string parameters
/// Wraps the parameter with axum::extract::Query extractor
#[proc_macro_attribute]
pub fn query(_attr: TokenStream, item: TokenStream) -> TokenStream {
    item
}
