use anyhow::Result;
use chatsync_application::AvailabilityProbe;
use chatsync_core::remote::RemoteStore;
use chatsync_core::settings::FrontendSettings;
use std::sync::Arc;

pub async fn run(remote: Arc<dyn RemoteStore>) -> Result<()> {
    let health = AvailabilityProbe::new(remote.clone()).probe().await;

    let marker = if health.available { "✅" } else { "❌" };
    println!("{marker} {}", health.status);
    if !health.is_consistent() {
        println!(
            "⚠️  availability and status disagree (available={})",
            health.available
        );
    }

    match remote.get_settings().await {
        Ok(settings) => {
            for line in settings_lines(&settings) {
                println!("   {line}");
            }
        }
        Err(e) => println!("   settings unavailable: {e}"),
    }
    Ok(())
}

fn settings_lines(settings: &FrontendSettings) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(ui) = &settings.ui {
        lines.push(format!("ui title: {}", ui.title));
    }
    lines.push(format!("feedback enabled: {}", settings.is_feedback_enabled()));
    lines
}
