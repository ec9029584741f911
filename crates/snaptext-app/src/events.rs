use kanal::{AsyncReceiver, AsyncSender};
use snaptext_config::Config;
use snaptext_core::{CaptureController, ControllerEvent, Devices};
use snaptext_types::UiEvent;
use tokio_util::sync::CancellationToken;

/// Controller task: owns the session from start-up to teardown
pub async fn event_loop(
    config: Config,
    devices: Devices,
    (queue_tx, queue_rx): (AsyncSender<ControllerEvent>, AsyncReceiver<ControllerEvent>),
    ui_tx: AsyncSender<UiEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let controller = CaptureController::new(config, devices, queue_tx, ui_tx, cancel);

    // Diagnostic only; the workflow never waits on it
    let probe = controller.start();

    controller.run(queue_rx).await;

    if !probe.is_finished() {
        probe.abort();
    }
    Ok(())
}
