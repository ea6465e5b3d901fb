//! Typed event relay over an unbounded channel.
//!
//! A relay lets code that runs outside a dispatch (fetch callbacks, signal
//! observers, DOM listeners) hand navigation requests to the single loop
//! that owns the router.

use futures::channel::mpsc::{UnboundedReceiver, UnboundedSender, unbounded};

/// Sending half of an event stream.
///
/// Relays follow the `{source}_{event}_relay` naming pattern, e.g.
/// `navigation_requested_relay`.
///
/// ```rust
/// let (navigation_requested_relay, mut requests) = relay::<NavigationRequest>();
/// navigation_requested_relay.try_send(NavigationRequest::push("/events"))?;
///
/// while let Some(request) = requests.next().await {
///     navigation.process(request);
/// }
/// ```
#[derive(Clone, Debug)]
pub struct Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    sender: UnboundedSender<T>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RelayError {
    #[error("relay receiver has been dropped")]
    ChannelClosed,
}

impl<T> Relay<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> (Self, UnboundedReceiver<T>) {
        let (sender, receiver) = unbounded();
        (Relay { sender }, receiver)
    }

    /// Send an event, failing once the receiving loop is gone.
    pub fn try_send(&self, value: T) -> Result<(), RelayError> {
        self.sender
            .unbounded_send(value)
            .map_err(|_| RelayError::ChannelClosed)
    }
}

pub fn relay<T>() -> (Relay<T>, UnboundedReceiver<T>)
where
    T: Clone + Send + Sync + 'static,
{
    Relay::new()
}
