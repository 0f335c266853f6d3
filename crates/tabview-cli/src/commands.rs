//! Command handlers
//!
//! Each command drives a `TableBrowser` against the HTTP engine the way an
//! interactive front end would, then prints what the browser shows.

use anyhow::{Context, Result, anyhow, bail};
use std::sync::Arc;
use std::time::Duration;
use tabview_core::{QueryEngine, record_id};
use tabview_remote::HttpEngine;
use tabview_services::{Delivery, PendingQuery, TableBrowser, group_metrics, load_metrics};

use crate::args::QueryArgs;
use crate::render;
use crate::settings::Settings;

pub struct Runner {
    settings: Settings,
    engine: Arc<HttpEngine>,
}

/// Await a query and require it to be displayed
async fn deliver(browser: &mut TableBrowser, pending: PendingQuery) -> Result<()> {
    match browser.run(pending).await {
        Delivery::Applied => Ok(()),
        Delivery::Failed(e) => Err(e.into()),
        Delivery::Discarded => bail!("Query response was superseded"),
    }
}

fn print_page(browser: &TableBrowser) {
    let descriptor = browser.descriptor();
    let filters = render::active_filters(descriptor);
    if !filters.is_empty() {
        println!("Filters: {}", filters.join(" "));
    }
    if !descriptor.search_term.is_empty() {
        println!("Search: {}", descriptor.search_term);
    }
    if let Some(result) = browser.result() {
        if result.rows.is_empty() {
            println!("No rows match.");
        } else {
            println!("{}", render::page(result, descriptor));
        }
        println!("{}", render::footer(result));
    }
}

/// Print notices; fail if any is an error
fn drain_notices(browser: &TableBrowser) -> Result<()> {
    let mut failure = None;
    for notice in browser.notices() {
        if notice.is_error() {
            eprintln!("{}", render::notice(notice));
            failure = Some(notice.message.clone());
        } else {
            println!("{}", render::notice(notice));
        }
    }
    match failure {
        Some(message) => Err(anyhow!(message)),
        None => Ok(()),
    }
}

impl Runner {
    pub fn new(settings: Settings) -> Result<Self> {
        let engine =
            HttpEngine::new(settings.remote_config()).context("Invalid engine configuration")?;
        Ok(Self {
            settings,
            engine: Arc::new(engine),
        })
    }

    fn session_id(&self) -> &str {
        &self.settings.session_id
    }

    async fn browser(&self) -> Result<TableBrowser> {
        let engine = Arc::clone(&self.engine) as Arc<dyn QueryEngine>;
        let mut browser = TableBrowser::new(engine, self.session_id());
        browser.load_schema().await?;
        Ok(browser)
    }

    /// Browser with the page described by `args` loaded
    async fn open(&self, args: &QueryArgs) -> Result<TableBrowser> {
        let mut browser = self.browser().await?;
        let descriptor = args.descriptor(&browser, &self.settings)?;
        if args.explain {
            println!("{}", descriptor.explain());
        }
        let pending = browser.replace_descriptor(descriptor);
        deliver(&mut browser, pending).await?;
        Ok(browser)
    }

    pub async fn schema(&self) -> Result<()> {
        let browser = self.browser().await?;
        if browser.schema().is_empty() {
            println!("Session '{}' has no columns.", self.session_id());
            return Ok(());
        }
        println!("{}", render::schema(browser.schema()));
        Ok(())
    }

    pub async fn query(&self, args: &QueryArgs) -> Result<()> {
        let browser = self.open(args).await?;
        print_page(&browser);
        Ok(())
    }

    pub async fn edit(
        &self,
        record: &str,
        field: &str,
        value: &str,
        args: &QueryArgs,
    ) -> Result<()> {
        let mut browser = self.open(args).await?;
        if !browser.schema().iter().any(|c| c.name == field) {
            bail!("Unknown column '{}'", field);
        }

        let row_index = browser
            .result()
            .and_then(|r| {
                r.rows
                    .iter()
                    .position(|row| record_id(row).as_deref() == Some(record))
            })
            .ok_or_else(|| {
                anyhow!(
                    "Record '{}' is not on page {} of this query",
                    record,
                    args.page
                )
            })?;

        browser.begin_edit(row_index, field)?;
        browser.editor_mut().set_value(value)?;
        let save = browser.commit_edit()?;
        let completion = save.resolve().await;
        match browser.complete_edit(completion) {
            Some(refetch) => {
                deliver(&mut browser, refetch).await?;
                println!("Updated '{}' of record {}.", field, record);
                print_page(&browser);
                Ok(())
            }
            None => {
                let message = browser
                    .editor_mut()
                    .acknowledge_failure()
                    .unwrap_or_else(|| "Failed to update field".to_string());
                bail!(message)
            }
        }
    }

    pub async fn delete(&self, args: &QueryArgs, confirmed: bool) -> Result<()> {
        let mut browser = self.open(args).await?;
        let matching = browser.result().map(|r| r.total_elements).unwrap_or(0);
        if matching == 0 {
            println!("No records match; nothing to delete.");
            return Ok(());
        }
        if !confirmed {
            println!("{}", browser.descriptor().explain());
            bail!(
                "{} records match; re-run with --yes to delete them",
                matching
            );
        }

        let outcome = browser.prepare_delete().resolve().await;
        if let Some(refetch) = browser.complete_delete(outcome) {
            deliver(&mut browser, refetch).await?;
        }
        drain_notices(&browser)?;
        if let Some(result) = browser.result() {
            println!("{}", render::footer(result));
        }
        Ok(())
    }

    pub async fn export(&self) -> Result<()> {
        let mut browser = TableBrowser::new(
            Arc::clone(&self.engine) as Arc<dyn QueryEngine>,
            self.session_id(),
        );
        let outcome = browser.prepare_export().resolve().await;
        browser.complete_export(outcome);
        drain_notices(&browser)
    }

    pub async fn metrics(&self, watch: Option<u64>) -> Result<()> {
        loop {
            let metrics = load_metrics(self.engine.as_ref(), self.session_id()).await?;
            println!("{}", render::metrics(&group_metrics(&metrics)));

            let Some(secs) = watch else {
                return Ok(());
            };
            tokio::select! {
                _ = tokio::signal::ctrl_c() => return Ok(()),
                _ = tokio::time::sleep(Duration::from_secs(secs.max(1))) => {}
            }
        }
    }

    pub async fn sessions(&self) -> Result<()> {
        let sessions = self
            .engine
            .list_sessions()
            .await
            .context("Failed to list sessions")?;
        if sessions.is_empty() {
            println!("The engine holds no sessions.");
            return Ok(());
        }
        println!("{}", render::sessions(&sessions, self.session_id()));
        Ok(())
    }

    pub async fn clear(&self, confirmed: bool) -> Result<()> {
        if !confirmed {
            let session = self
                .engine
                .session_status(self.session_id())
                .await
                .context("Failed to read session status")?;
            bail!(
                "Session '{}' ({} columns, has data: {}); re-run with --yes to clear it",
                self.session_id(),
                session.column_count,
                session.has_data
            );
        }

        let mut browser = TableBrowser::new(
            Arc::clone(&self.engine) as Arc<dyn QueryEngine>,
            self.session_id(),
        );
        let outcome = browser.prepare_clear().resolve().await;
        if let Some(refetch) = browser.complete_clear(outcome) {
            deliver(&mut browser, refetch).await?;
        }
        drain_notices(&browser)?;
        if let Some(result) = browser.result() {
            println!("{}", render::footer(result));
        }
        Ok(())
    }

    pub async fn status(&self) -> Result<()> {
        let health = self
            .engine
            .health()
            .await
            .context("Engine health check failed")?;
        let session = self
            .engine
            .session_status(self.session_id())
            .await
            .context("Failed to read session status")?;
        println!("{}", render::status(&health, self.session_id(), &session));
        if !health.is_up() {
            bail!("Engine reports status {}", health.status);
        }
        Ok(())
    }
}
