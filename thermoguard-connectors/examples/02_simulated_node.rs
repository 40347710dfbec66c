//! Simulated Node
//!
//! Runs the epoch supervisor against simulated hardware: a probe that
//! heats up, a WiFi link that drops after a few seconds and an outbox that
//! collects the mail.
//!
//! ## Running the Example
//!
//! ```bash
//! cargo run -p thermoguard-connectors --example 02_simulated_node
//! ```

use std::time::Duration;

use thermoguard_connectors::{
    mail::{MailSettings, Outbox},
    sim::{ScriptedButton, ScriptedSensor, SimLink},
    supervisor::{NoSession, Supervisor, SupervisorOptions},
};
use thermoguard_core::config::MonitorConfig;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("ThermoGuard Simulated Node");
    println!("==========================\n");

    let config = MonitorConfig::builder()
        .sample_interval(1_000)
        .notification_interval(60_000)
        .without_heartbeat()
        .build()?;

    let mut supervisor = Supervisor::new(
        config,
        ScriptedSensor::raw([27.0, 29.0, 31.0, 33.0, 35.5, 36.0, 34.0]),
        SimLink::dropping_after(8),
        Outbox::new(MailSettings::new("node@example.com", ["ops@example.com"])),
        ScriptedButton::released(),
        NoSession,
        SupervisorOptions::default()
            .loop_tick(Duration::from_millis(500))
            .max_epochs(1),
    );

    let summary = supervisor.run_epoch().await;
    println!("Epoch {} ended: {:?} in state {}", summary.index, summary.reason, summary.final_state);
    println!("Loop ticks: {}\n", summary.ticks);

    for envelope in supervisor.transport().envelopes() {
        println!("To: {}", envelope.to.join(", "));
        println!("Subject: {}", envelope.subject);
        println!("{}\n", envelope.body);
    }

    Ok(())
}
