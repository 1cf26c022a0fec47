//! pinch_volume — entry point.

use pinch_volume::app::{run, AppConfig};

fn main() {
    env_logger::init();

    println!();
    println!("╔══════════════════════════════════════════════════╗");
    println!("║   Pinch Volume — hand-gesture volume control     ║");
    println!("╚══════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "webcam")]
    println!("  Camera: webcam");
    #[cfg(not(feature = "webcam"))]
    println!("  Camera: simulation  (use --features webcam for hardware)");

    #[cfg(feature = "system-volume")]
    println!("  Audio:  ALSA Master mixer");
    #[cfg(not(feature = "system-volume"))]
    println!("  Audio:  display only  (use --features system-volume to push)");
    println!();

    if let Err(e) = run(AppConfig::default()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
