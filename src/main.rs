use anyhow::Result;
use image::{Rgba, RgbaImage};
use log::{info, warn};
use sprite_kinetics::engine::physics::CollisionDetector;
use sprite_kinetics::{ClipDefinition, EngineConfig, ImageStore, Sprite, TickScheduler};

/// Ticks to simulate before giving up on a contact
const MAX_TICKS: u32 = 600;

/// Filled disc on a transparent square, two frames side by side
fn ball_sheet(diameter: u32) -> RgbaImage {
    let radius = diameter as f32 / 2.0;
    let mut sheet = RgbaImage::new(diameter * 2, diameter);
    for frame in 0..2 {
        let shade = if frame == 0 { 220 } else { 160 };
        for y in 0..diameter {
            for x in 0..diameter {
                let dx = x as f32 + 0.5 - radius;
                let dy = y as f32 + 0.5 - radius;
                if dx * dx + dy * dy <= radius * radius {
                    sheet.put_pixel(frame * diameter + x, y, Rgba([shade, shade, 40, 255]));
                }
            }
        }
    }
    sheet
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting sprite-kinetics demo...");

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/engine.json".to_string());
    let config = EngineConfig::load_or_default(&config_path);

    let mut images = ImageStore::new(&config.assets.root);
    images.insert("ball.png", ball_sheet(16));
    images.insert("floor.png", RgbaImage::from_pixel(200, 8, Rgba([90, 90, 90, 255])));

    let mut ball = Sprite::new("ball", 92.0, 0.0, 16.0, 16.0);
    ball.define_clip(&mut images, &ClipDefinition::sheet("spin", &["ball.png"], 1, 2));
    ball.set_playback_speed(0.25);
    ball.set_velocity(0.5, 0.0);
    if let Err(err) = ball.apply_force(0.0, 0.2) {
        warn!("Gravity not applied: {}", err);
    }

    // Zero size: adopts the floor image's dimensions once loaded
    let mut floor = Sprite::new("floor", 0.0, 120.0, 0.0, 0.0);
    floor.source(&mut images, &["floor.png"]);

    let detector = CollisionDetector::new(config.collision.clone());
    let mut scheduler = TickScheduler::from_config(&config);
    let tick = scheduler.tick_duration();

    while scheduler.tick_count() < MAX_TICKS as u64 {
        for event in images.poll_events() {
            ball.on_image_loaded(&event);
            floor.on_image_loaded(&event);
        }

        for _ in 0..scheduler.advance_by(tick) {
            ball.update();
        }

        if ball.within(&floor) && detector.are_colliding(&ball, &floor, &images) {
            let position = ball.position();
            info!(
                "'{}' hit '{}' at ({:.1}, {:.1}) after {} ticks",
                ball.id,
                floor.id,
                position.x,
                position.y,
                scheduler.tick_count()
            );
            return Ok(());
        }
    }

    warn!("No contact after {} ticks", MAX_TICKS);
    Ok(())
}
