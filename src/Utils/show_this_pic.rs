use std::path::Path;
use std::process::Command;

/// Open an image with the platform's default viewer.
///
/// Used when a figure is rendered without a save path: the file is written
/// to a temporary location and handed to the desktop environment.
pub fn open_with_default_viewer(image_path: &Path) -> Result<(), std::io::Error> {
    #[cfg(target_os = "windows")]
    {
        Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(image_path)
            .spawn()?;
    }

    #[cfg(target_os = "macos")]
    {
        Command::new("open").arg(image_path).spawn()?;
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        Command::new("xdg-open").arg(image_path).spawn()?;
    }

    Ok(())
}
