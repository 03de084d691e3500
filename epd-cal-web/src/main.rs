use std::{env, fs, path::PathBuf};

use actix_web::{
    get, http::header::ContentType, middleware, web, App, HttpResponse, HttpServer, Responder,
    ResponseError,
};
use epd_cal::{
    calendar::{self, CalendarDisplay},
    canvas::{self, Canvas},
    clock,
};
use serde::{Deserialize, Serialize};

mod listing;

#[derive(thiserror::Error, Debug)]
enum Error {
    #[error("Failed to build bitmap: {0}")]
    Canvas(#[from] canvas::Error),

    #[error("Failed to render calendar: {0}")]
    Calendar(#[from] calendar::Error),

    #[error(transparent)]
    Clock(#[from] clock::Error),

    #[error(transparent)]
    Listing(#[from] listing::Error),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ResponseError for Error {
    fn error_response(&self) -> HttpResponse {
        use Error::*;

        match self {
            Canvas(err) => {
                use canvas::Error::*;
                match err {
                    InvalidDimension | InvalidColorDepth => {
                        HttpResponse::BadRequest().body(self.to_string())
                    }
                    _ => HttpResponse::InternalServerError().body(self.to_string()),
                }
            }
            Clock(_) => HttpResponse::BadRequest().body(self.to_string()),
            NotFound(_) => HttpResponse::NotFound().body(self.to_string()),
            Calendar(_) | Listing(_) | Io(_) => {
                HttpResponse::InternalServerError().body(self.to_string())
            }
        }
    }
}

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Clone)]
struct AppState {
    static_dir: PathBuf,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[get("/health")]
async fn health() -> impl Responder {
    web::Json(HealthResponse { status: "healthy" })
}

#[derive(Deserialize)]
struct TimeOptions {
    #[serde(default = "default_timezone")]
    timezone: String,
}

fn default_timezone() -> String {
    "UTC".to_string()
}

#[derive(Serialize)]
struct TimeResponse {
    current_time: String,
}

#[get("/time")]
async fn get_time(options: web::Query<TimeOptions>) -> Result<impl Responder> {
    let current_time = clock::time_in_zone(&options.timezone)?;
    Ok(web::Json(TimeResponse { current_time }))
}

#[derive(Deserialize)]
struct BitmapOptions {
    #[serde(default = "default_dimension")]
    width: u32,
    #[serde(default = "default_dimension")]
    height: u32,
    #[serde(default = "default_color_depth", rename = "colorDepth")]
    color_depth: u8,
}

fn default_dimension() -> u32 {
    100
}

fn default_color_depth() -> u8 {
    1
}

const RECT_INSET: i32 = 10;

#[get("/bitmap.bmp")]
async fn get_bitmap(
    state: web::Data<AppState>,
    options: web::Query<BitmapOptions>,
) -> Result<impl Responder> {
    let mut canvas = Canvas::new(options.width, options.height, options.color_depth)?;
    canvas.draw_rect(
        RECT_INSET,
        RECT_INSET,
        options.width.saturating_sub(2 * RECT_INSET as u32),
        options.height.saturating_sub(2 * RECT_INSET as u32),
    );

    let bytes = canvas.encode()?;
    let path = state
        .static_dir
        .join(format!("bitmap_{}x{}.bmp", options.width, options.height));
    fs::write(&path, &bytes)?;

    Ok(HttpResponse::Ok().content_type("image/bmp").body(bytes))
}

#[get("/calendar.bmp")]
async fn get_calendar(state: web::Data<AppState>) -> Result<impl Responder> {
    let path = CalendarDisplay::new(&state.static_dir).render()?;
    let bytes = fs::read(path)?;

    Ok(HttpResponse::Ok().content_type("image/bmp").body(bytes))
}

#[get("/files")]
async fn get_files(state: web::Data<AppState>) -> Result<impl Responder> {
    let page = listing::render_listing(&state.static_dir)?;

    Ok(HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(page))
}

#[get("/static/{filename}")]
async fn get_static(
    state: web::Data<AppState>,
    filename: web::Path<String>,
) -> Result<impl Responder> {
    let filename = filename.into_inner();

    // One flat directory; anything path-shaped is treated as absent.
    if filename.contains(['/', '\\']) || filename.contains("..") {
        return Err(Error::NotFound(filename));
    }

    let path = state.static_dir.join(&filename);
    let bytes = fs::read(&path).map_err(|_| Error::NotFound(filename.clone()))?;

    let content_type = if filename.ends_with(".bmp") {
        "image/bmp"
    } else {
        "application/octet-stream"
    };

    Ok(HttpResponse::Ok().content_type(content_type).body(bytes))
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(health)
        .service(get_time)
        .service(get_bitmap)
        .service(get_calendar)
        .service(get_files)
        .service(get_static);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let listen_address = env::var("LISTEN_ADDRESS").unwrap_or("127.0.0.1:8080".to_string());
    let static_dir = PathBuf::from(env::var("STATIC_DIR").unwrap_or("./static".to_string()));
    fs::create_dir_all(&static_dir)?;

    let state = AppState { static_dir };

    log::info!("Listening on {listen_address}");

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes)
    })
    .bind(listen_address)?
    .run()
    .await
}
