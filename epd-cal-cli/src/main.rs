use std::{env, fs};

use anyhow::Result;
use epd_cal::calendar::CalendarDisplay;

fn main() -> Result<()> {
    env_logger::init();

    let out_dir = env::args().nth(1).unwrap_or("./static".to_string());
    fs::create_dir_all(&out_dir)?;

    let path = CalendarDisplay::new(out_dir).render()?;
    println!("{}", path.display());

    Ok(())
}
