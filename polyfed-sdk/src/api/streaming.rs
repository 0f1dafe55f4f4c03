//! Streaming endpoint wiring on the client facade.

use url::Url;

use crate::Client;
use crate::channel::StreamingChannel;
use crate::errors::{Error, RequestError, Result};

impl Client {
    /// The streaming channel, opening it on first use. At most one channel
    /// exists per client; it is replaced wholesale after closing (and is
    /// closed automatically when the credential changes).
    pub fn streaming(&mut self) -> Result<&StreamingChannel> {
        if self.channel.is_none() {
            let url = self.streaming_url()?;
            self.channel = Some(StreamingChannel::connect(url));
        }
        Ok(self.channel.as_ref().expect("channel was just opened"))
    }

    /// Close the streaming channel, if open.
    pub fn close_streaming(&mut self) {
        if let Some(channel) = self.channel.take() {
            channel.close();
        }
    }

    /// Resolve the websocket endpoint: the snapshot's declared streaming
    /// URL when present, the base URL with a websocket scheme otherwise.
    /// The bearer credential rides along as a query parameter, which is
    /// why the channel is bound to the credential at connect time.
    fn streaming_url(&self) -> Result<Url> {
        self.require(self.features().streaming, "streaming")?;

        let mut url = match &self.instance().configuration.urls.streaming {
            Some(declared) => Url::parse(declared).map_err(Error::Parse)?,
            None => {
                let mut url = self.transport.base.clone();
                let scheme = if url.scheme() == "http" { "ws" } else { "wss" };
                url.set_scheme(scheme).map_err(|()| {
                    Error::from(RequestError::Validation {
                        message: "base URL cannot carry a websocket scheme".into(),
                    })
                })?;
                url
            }
        };
        url.set_path("/api/v1/streaming");

        if let Some(token) = &self.transport.token {
            url.query_pairs_mut().append_pair("access_token", token);
        }
        Ok(url)
    }
}
