use crate::error::{Error, Result};
use crate::extract::RawCandidate;
use crate::page::PageOps;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchKeyEventParams, DispatchKeyEventType,
};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

const FIND_POLL_INTERVAL: Duration = Duration::from_millis(250);

/// Owns the lifecycle of one browser and one page for a single run.
///
/// Callers must call `close` on every exit path; the session holds no retry
/// logic of its own.
pub struct BrowserSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    nav_timeout: Duration,
}

impl BrowserSession {
    /// Launch Chromium (headless unless `headful`) and open a blank page.
    pub async fn open(headful: bool, nav_timeout: Duration) -> Result<Self> {
        let mut builder = BrowserConfig::builder()
            .no_sandbox()
            .window_size(1280, 900);
        if headful {
            builder = builder.with_head();
        }
        let config = builder.build().map_err(Error::Launch)?;

        tracing::info!(headful, "launching browser");
        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|err| Error::Launch(err.to_string()))?;

        // The handler stream must be driven for any CDP command to complete.
        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    tracing::debug!("CDP handler event error (continuing): {err}");
                }
            }
        });

        let page = browser.new_page("about:blank").await?;
        Ok(Self {
            browser,
            page,
            handler_task,
            nav_timeout,
        })
    }

    /// Close the browser and stop the handler task. Best-effort: a browser
    /// that already died must not turn a produced result into an error.
    pub async fn close(mut self) {
        if let Err(err) = self.browser.close().await {
            tracing::debug!("browser close failed: {err}");
        }
        if let Err(err) = self.browser.wait().await {
            tracing::debug!("browser wait failed: {err}");
        }
        self.handler_task.abort();
    }

    async fn find_within(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<chromiumoxide::element::Element> {
        let deadline = Instant::now() + timeout;
        loop {
            if let Ok(element) = self.page.find_element(selector).await {
                return Ok(element);
            }
            if Instant::now() >= deadline {
                return Err(Error::SelectorNotFound(selector.to_string()));
            }
            tokio::time::sleep(FIND_POLL_INTERVAL).await;
        }
    }

    async fn eval_json<T: serde::de::DeserializeOwned>(&self, script: String) -> Result<T> {
        let evaluation = self
            .page
            .evaluate(script)
            .await
            .map_err(|err| Error::Evaluate(err.to_string()))?;
        evaluation
            .into_value()
            .map_err(|err| Error::Evaluate(err.to_string()))
    }
}

#[async_trait]
impl PageOps for BrowserSession {
    async fn navigate(&self, url: &str) -> Result<()> {
        tracing::debug!(url, "navigating");
        let nav = async {
            self.page.goto(url).await?;
            self.page.wait_for_navigation().await?;
            Ok::<_, chromiumoxide::error::CdpError>(())
        };
        match tokio::time::timeout(self.nav_timeout, nav).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(err)) => Err(Error::Navigation(format!("{url}: {err}"))),
            Err(_) => Err(Error::Navigation(format!(
                "{url}: timed out after {:?}",
                self.nav_timeout
            ))),
        }
    }

    async fn wait_for_selector(&self, selector: &str, timeout: Duration) -> Result<()> {
        self.find_within(selector, timeout).await.map(|_| ())
    }

    async fn click(&self, selector: &str, timeout: Duration) -> Result<()> {
        let element = self.find_within(selector, timeout).await?;
        element.click().await?;
        Ok(())
    }

    async fn fill(&self, selector: &str, value: &str, timeout: Duration) -> Result<()> {
        let element = self.find_within(selector, timeout).await?;
        // Click first so the element takes focus before typing.
        element.click().await?;
        element.type_str(value).await?;
        Ok(())
    }

    async fn press_enter(&self) -> Result<()> {
        let down = DispatchKeyEventParams::builder()
            .r#type(DispatchKeyEventType::KeyDown)
            .key("Enter")
            .code("Enter")
            .text("\r")
            .windows_virtual_key_code(13)
            .native_virtual_key_code(13)
            .build()
            .map_err(Error::Cdp)?;
        let up = DispatchKeyEventParams::builder()
            .r#type(DispatchKeyEventType::KeyUp)
            .key("Enter")
            .code("Enter")
            .windows_virtual_key_code(13)
            .native_virtual_key_code(13)
            .build()
            .map_err(Error::Cdp)?;
        self.page.execute(down).await?;
        self.page.execute(up).await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        let url = self.page.url().await?;
        Ok(url.unwrap_or_else(|| "about:blank".to_string()))
    }

    async fn collect_result_candidates(&self, selector: &str) -> Result<Vec<RawCandidate>> {
        let selector_json = serde_json::to_string(selector)
            .map_err(|err| Error::Evaluate(err.to_string()))?;
        let script = format!(
            r#"(() => {{
  const sel = {selector_json};
  const tokensOf = (el) => {{
    const out = [];
    for (let node = el; node; node = node.parentElement) {{
      for (const cls of node.classList) out.push(cls.toLowerCase());
      for (const attr of node.attributes || []) {{
        if (attr.name.startsWith('data-')) out.push(attr.name.slice(5).toLowerCase());
      }}
    }}
    return out;
  }};
  const badgeOf = (el) => {{
    const container = el.closest('li, article, .result, .search-result') || el.parentElement;
    if (!container) return null;
    const badge = container.querySelector('.badge, .label, [aria-label], sup, small');
    return badge ? badge.textContent.trim().slice(0, 40) : null;
  }};
  return Array.from(document.querySelectorAll(sel)).slice(0, 10).map((el) => {{
    const rect = el.getBoundingClientRect();
    return {{
      title: (el.textContent || '').trim(),
      href: el.getAttribute('href') || '',
      visible: rect.width > 0 && rect.height > 0,
      markers: tokensOf(el),
      badge: badgeOf(el),
    }};
  }});
}})()"#
        );
        self.eval_json(script).await
    }

    async fn snapshot(&self) -> Result<serde_json::Value> {
        let script = r#"(() => {
  const describe = (el) => {
    const id = el.id ? '#' + el.id : '';
    const name = el.getAttribute('name');
    const aria = el.getAttribute('aria-label');
    const type = el.getAttribute('type');
    return {
      tag: el.tagName.toLowerCase() + id,
      name: name || undefined,
      aria_label: aria || undefined,
      type: type || undefined,
      text: (el.textContent || '').trim().slice(0, 60) || undefined,
    };
  };
  return {
    title: document.title,
    url: location.href,
    inputs: Array.from(document.querySelectorAll('input, textarea')).slice(0, 15).map(describe),
    buttons: Array.from(document.querySelectorAll('button, [role="button"]')).slice(0, 15).map(describe),
    links: Array.from(document.querySelectorAll('a[href]')).slice(0, 20).map(describe),
  };
})()"#;
        self.eval_json(script.to_string()).await
    }
}
