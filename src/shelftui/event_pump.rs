use crossterm::event::Event;
use tokio::sync::mpsc;

/// Pumps crossterm events into a channel so the application loop can select
/// over terminal input and internal messages.
pub fn crossterm_events() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(10);
    tokio::task::spawn_blocking(move || loop {
        match crossterm::event::read() {
            Ok(event) => {
                if sender.blocking_send(event).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
    receiver
}
