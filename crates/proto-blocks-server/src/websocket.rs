//! WebSocket-based live reload.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Messages sent to clients for hot reload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HmrMessage {
    /// Connection established
    Connected,

    /// Full page reload
    Reload,

    /// Replace the rendered body of one pattern page
    UpdateContent {
        /// Page URL
        path: String,
        /// New article HTML
        html: String,
    },

    /// Re-fetch stylesheets without reloading the page
    ReloadStyles,
}

/// Hub for broadcasting HMR messages to all connected clients.
#[derive(Debug, Clone)]
pub struct HmrHub {
    sender: broadcast::Sender<HmrMessage>,
}

impl HmrHub {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(100);
        Self { sender }
    }

    /// Send a message to all connected clients.
    pub fn send(&self, msg: HmrMessage) {
        // No receivers is not an error
        let _ = self.sender.send(msg);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HmrMessage> {
        self.sender.subscribe()
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for HmrHub {
    fn default() -> Self {
        Self::new()
    }
}

/// Client-side live reload script, served at `/__hmr.js`.
///
/// Connects back to the host that served the page.
pub fn hmr_client_script() -> &'static str {
    HMR_CLIENT
}

const HMR_CLIENT: &str = r#"
(function() {
  'use strict';

  const url = (location.protocol === 'https:' ? 'wss://' : 'ws://') + location.host + '/__hmr';
  const ws = new WebSocket(url);

  function samePage(path) {
    const here = location.pathname.endsWith('/') ? location.pathname : location.pathname + '/';
    return here === path || (path === '/' && here === '/patterns/');
  }

  ws.onmessage = function(event) {
    const msg = JSON.parse(event.data);

    switch (msg.type) {
      case 'reload':
        location.reload();
        break;

      case 'update_content':
        if (!samePage(msg.path)) break;
        const article = document.querySelector('article.pattern');
        if (article) {
          article.innerHTML = msg.html;
        } else {
          location.reload();
        }
        break;

      case 'reload_styles':
        document.querySelectorAll('link[rel="stylesheet"]').forEach(function(link) {
          const href = link.href.split('?')[0];
          link.href = href + '?t=' + Date.now();
        });
        break;

      case 'connected':
        console.log('[proto-blocks] live reload connected');
        break;
    }
  };

  ws.onclose = function() {
    console.log('[proto-blocks] live reload disconnected, retrying');
    setTimeout(function() { location.reload(); }, 1000);
  };
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hub_broadcasts_messages() {
        let hub = HmrHub::new();
        let mut first = hub.subscribe();
        let mut second = hub.subscribe();
        assert_eq!(hub.subscriber_count(), 2);

        hub.send(HmrMessage::Reload);

        assert_eq!(first.try_recv().unwrap(), HmrMessage::Reload);
        assert_eq!(second.try_recv().unwrap(), HmrMessage::Reload);
    }

    #[test]
    fn send_without_subscribers_is_silent() {
        HmrHub::new().send(HmrMessage::ReloadStyles);
    }

    #[test]
    fn serializes_messages() {
        let msg = HmrMessage::UpdateContent {
            path: "/cards/".to_string(),
            html: "<p>x</p>".to_string(),
        };

        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "type": "update_content", "path": "/cards/", "html": "<p>x</p>" })
        );
        assert_eq!(
            serde_json::to_string(&HmrMessage::ReloadStyles).unwrap(),
            r#"{"type":"reload_styles"}"#
        );
    }

    #[test]
    fn client_handles_every_message() {
        let script = hmr_client_script();
        for kind in ["reload", "update_content", "reload_styles", "connected"] {
            assert!(script.contains(&format!("case '{kind}'")), "{kind} not handled");
        }
        assert!(script.contains("location.host + '/__hmr'"));
    }
}
