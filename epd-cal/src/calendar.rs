use std::path::PathBuf;

use chrono::{DateTime, Datelike, Local};

use crate::canvas::{self, Canvas};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to render calendar: {0}")]
    Render(#[from] canvas::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Panel geometry of a 2.9" e-paper display.
pub const WIDTH: u32 = 296;
pub const HEIGHT: u32 = 128;

const COLOR_DEPTH: u8 = 1;
const MARGIN: i32 = 10;
const LINE_HEIGHT: i32 = 16;
const FONT_PX: u32 = 12;

const FILE_NAME: &str = "calendar.bmp";

/// Renders the current date and time as a 1-bit calendar face: month, day
/// and weekday stacked on the left half, the time on the right half.
pub struct CalendarDisplay {
    out_dir: PathBuf,
}

impl CalendarDisplay {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Renders the calendar for the current moment and returns the path of
    /// the written file.
    pub fn render(&self) -> Result<PathBuf> {
        self.render_at(Local::now())
    }

    /// Every displayed field derives from the one `moment` captured by the
    /// caller, so the date and time can never straddle a midnight rollover.
    pub fn render_at(&self, moment: DateTime<Local>) -> Result<PathBuf> {
        let mut canvas = Canvas::new(WIDTH, HEIGHT, COLOR_DEPTH)?;

        let date_line = format!("{} {}", moment.format("%B"), moment.day());
        let weekday = moment.format("%A").to_string();
        let time_line = moment.format("%H:%M:%S").to_string();

        canvas.draw_text(MARGIN, MARGIN, FONT_PX, &date_line);
        canvas.draw_text(MARGIN, MARGIN + LINE_HEIGHT, FONT_PX, &weekday);
        canvas.draw_text(WIDTH as i32 / 2 + MARGIN, MARGIN, FONT_PX, &time_line);

        let path = self.out_dir.join(FILE_NAME);
        canvas.save(&path)?;

        Ok(path)
    }
}
