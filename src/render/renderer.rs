//! Render dispatch and formula memoization

use crate::cache::{cache_key, CacheStats, CachedFormula, FormulaCache};
use crate::classify::{
    forces_display, has_alignment_environment, is_math_environment, looks_like_latex,
};
use crate::config::Config;
use crate::engine::{create_loader, EngineHandle, EngineLoader, FormulaEngine, LoadStatus, RenderOptions};
use crate::error::MathResult;
use crate::normalize::normalize_environments;
use crate::render::markup::{Markup, RenderedFormula};
use crate::render::RenderMode;
use crate::split::{split_mixed, Segment};
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, warn};

/// Outcome of a warmup run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct WarmupReport {
    /// Rendered by the engine and now cached
    pub rendered: usize,
    /// Already cached
    pub cached: usize,
    /// Fell back to source text
    pub failed: usize,
    /// Empty entries
    pub skipped: usize,
}

/// Pick a concrete mode for `auto`.
///
/// A bare environment goes straight to math mode; splitting it as mixed
/// content would find no `$` and leave it unrendered.
pub fn resolve_mode(content: &str) -> RenderMode {
    let has_dollar = content.contains('$');
    if is_math_environment(content) && !has_dollar {
        RenderMode::Math
    } else if has_dollar {
        RenderMode::Mixed
    } else if looks_like_latex(content) {
        RenderMode::Math
    } else {
        RenderMode::Text
    }
}

/// Strip one layer of `$$...$$` or `$...$` around the whole content
fn strip_delimiters(content: &str) -> &str {
    if let Some(inner) = content
        .strip_prefix("$$")
        .and_then(|rest| rest.strip_suffix("$$"))
    {
        return inner.trim();
    }
    if let Some(inner) = content
        .strip_prefix('$')
        .and_then(|rest| rest.strip_suffix('$'))
    {
        return inner.trim();
    }
    content
}

/// Source handed to the engine for a formula
fn prepare_source(content: &str) -> String {
    let stripped = strip_delimiters(content.trim());
    if has_alignment_environment(stripped) {
        normalize_environments(stripped).into_owned()
    } else {
        stripped.to_string()
    }
}

/// Math rendering service owning its cache and engine load state
pub struct MathRenderer {
    engine: EngineHandle,
    cache: Mutex<FormulaCache>,
    options: RenderOptions,
}

impl MathRenderer {
    /// Create a renderer around an explicit engine loader
    pub fn new(loader: Arc<dyn EngineLoader>, config: &Config) -> Self {
        Self {
            engine: EngineHandle::new(loader),
            cache: Mutex::new(FormulaCache::new(config.cache.effective_capacity())),
            options: RenderOptions::from_config(&config.render),
        }
    }

    /// Create a renderer using the configured engine backend
    pub fn from_config(config: &Config) -> MathResult<Self> {
        Ok(Self::new(create_loader(&config.engine)?, config))
    }

    fn cache(&self) -> MutexGuard<'_, FormulaCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Render content in the given mode
    pub async fn render(&self, content: &str, mode: RenderMode, inline: bool) -> Markup {
        let mode = match mode {
            RenderMode::Auto => {
                let resolved = resolve_mode(content);
                debug!("Auto mode resolved to {}", resolved.as_str());
                resolved
            }
            other => other,
        };

        match mode {
            RenderMode::Math => Markup::from_formula(self.render_formula(content, inline).await),
            RenderMode::Mixed => self.render_mixed(content).await,
            RenderMode::Text | RenderMode::Auto => Markup::text(content),
        }
    }

    /// Render one formula, served from the cache when possible.
    ///
    /// Returns `None` for empty content. Never fails: if the engine is
    /// unavailable or errors, the original content comes back marked as
    /// an error.
    pub async fn render_formula(&self, content: &str, inline: bool) -> Option<RenderedFormula> {
        if content.trim().is_empty() {
            return None;
        }

        let source = prepare_source(content);
        if source.is_empty() {
            return None;
        }

        let display_mode = !inline || is_math_environment(content) || forces_display(&source);
        let key = cache_key(&source, display_mode);

        let hit = self.cache().get(&key).cloned();
        if let Some(hit) = hit {
            return Some(RenderedFormula {
                html: hit.html,
                display_mode: hit.display_mode,
                cached: true,
                error: false,
            });
        }

        match self.render_uncached(&source, display_mode).await {
            Ok(html) => {
                self.cache().insert(
                    key,
                    CachedFormula {
                        html: html.clone(),
                        display_mode,
                    },
                );
                Some(RenderedFormula {
                    html,
                    display_mode,
                    cached: false,
                    error: false,
                })
            }
            Err(e) => {
                warn!("Showing formula source, render failed: {}", e);
                Some(RenderedFormula::fallback(content, display_mode))
            }
        }
    }

    async fn render_uncached(&self, source: &str, display_mode: bool) -> MathResult<String> {
        let engine = self.engine.ensure_loaded().await?;
        engine.render(source, display_mode, &self.options).await
    }

    /// Render prose with `$...$` and `$$...$$` formulas; text is kept verbatim
    pub async fn render_mixed(&self, content: &str) -> Markup {
        let mut markup = Markup::default();

        for segment in split_mixed(content) {
            let formula = match segment {
                Segment::Text(text) => {
                    markup.push_text(text);
                    continue;
                }
                Segment::InlineMath(source) => self.render_formula(source, true).await,
                Segment::DisplayMath(source) => self.render_formula(source, false).await,
            };
            if let Some(formula) = formula {
                markup.push_formula(formula);
            }
        }

        markup
    }

    /// Render formulas ahead of time so later renders hit the cache.
    ///
    /// Best-effort: failures are logged and counted, never returned.
    /// `on_progress` is called with each formula after it is processed.
    pub async fn warmup<I, S>(
        &self,
        formulas: I,
        inline: bool,
        on_progress: &(dyn Fn(&str) + Send + Sync),
    ) -> WarmupReport
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = WarmupReport::default();

        for formula in formulas {
            let formula = formula.as_ref();
            match self.render_formula(formula, inline).await {
                None => report.skipped += 1,
                Some(rendered) if rendered.error => {
                    warn!("Warmup skipped formula: {}", formula);
                    report.failed += 1;
                }
                Some(rendered) if rendered.cached => report.cached += 1,
                Some(_) => report.rendered += 1,
            }
            on_progress(formula);
        }

        debug!(
            "Warmup done: {} rendered, {} cached, {} failed, {} skipped",
            report.rendered, report.cached, report.failed, report.skipped
        );
        report
    }

    /// Load the engine now; retries after an earlier failure
    pub async fn preload(&self) -> MathResult<()> {
        self.engine.preload().await.map(|_| ())
    }

    /// The engine if it has finished loading
    pub fn loaded_engine(&self) -> Option<Arc<dyn FormulaEngine>> {
        self.engine.loaded()
    }

    pub fn engine_status(&self) -> LoadStatus {
        self.engine.status()
    }

    pub fn backend_name(&self) -> &'static str {
        self.engine.backend_name()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache().stats()
    }

    pub fn clear_cache(&self) {
        self.cache().clear();
        debug!("Render cache cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MathError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    /// Engine double: wraps the source in a tag and counts calls
    #[derive(Default)]
    struct FakeEngine {
        calls: AtomicUsize,
        fail: AtomicBool,
        sources: Mutex<Vec<(String, bool)>>,
    }

    #[async_trait]
    impl FormulaEngine for FakeEngine {
        async fn render(
            &self,
            source: &str,
            display_mode: bool,
            _options: &RenderOptions,
        ) -> MathResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.sources
                .lock()
                .unwrap()
                .push((source.to_string(), display_mode));
            if self.fail.load(Ordering::SeqCst) {
                return Err(MathError::RenderFailed("fake engine crashed".to_string()));
            }
            let tag = if display_mode { "div" } else { "span" };
            Ok(format!("<{tag} class=\"katex\">{source}</{tag}>"))
        }

        fn engine_name(&self) -> &'static str {
            "fake"
        }

        fn version(&self) -> &str {
            "0.0.0"
        }
    }

    struct FakeLoader {
        engine: Arc<FakeEngine>,
        loads: AtomicUsize,
        available: bool,
    }

    #[async_trait]
    impl EngineLoader for FakeLoader {
        async fn load(&self) -> MathResult<Arc<dyn FormulaEngine>> {
            self.loads.fetch_add(1, Ordering::SeqCst);
            if self.available {
                Ok(self.engine.clone())
            } else {
                Err(MathError::EngineNotFound {
                    binary: "katex".to_string(),
                })
            }
        }

        fn backend_name(&self) -> &'static str {
            "fake"
        }
    }

    fn renderer_with(config: &Config, available: bool) -> (MathRenderer, Arc<FakeEngine>, Arc<FakeLoader>) {
        let engine = Arc::new(FakeEngine::default());
        let loader = Arc::new(FakeLoader {
            engine: engine.clone(),
            loads: AtomicUsize::new(0),
            available,
        });
        (MathRenderer::new(loader.clone(), config), engine, loader)
    }

    fn renderer() -> (MathRenderer, Arc<FakeEngine>) {
        let (renderer, engine, _) = renderer_with(&Config::default(), true);
        (renderer, engine)
    }

    #[test]
    fn auto_mode_resolution() {
        assert_eq!(resolve_mode("\\begin{pmatrix}1\\end{pmatrix}"), RenderMode::Math);
        assert_eq!(resolve_mode("$\\frac{1}{2}$"), RenderMode::Mixed);
        assert_eq!(resolve_mode("area is $r^2$"), RenderMode::Mixed);
        assert_eq!(resolve_mode("\\alpha + \\beta"), RenderMode::Math);
        assert_eq!(resolve_mode("plain prose"), RenderMode::Text);
    }

    #[test]
    fn delimiters_stripped_once() {
        assert_eq!(prepare_source("$$x^2$$"), "x^2");
        assert_eq!(prepare_source(" $ x $ "), "x");
        assert_eq!(prepare_source("$$$x$$$"), "$x$");
        assert_eq!(prepare_source("a $b$ c"), "a $b$ c");
        assert_eq!(
            prepare_source("\\begin{align} a &= b \\end{align}"),
            "\\begin{aligned} a &= b \\end{aligned}"
        );
    }

    #[test]
    fn uppercase_environment_is_normalized() {
        assert_eq!(
            prepare_source("\\begin{ALIGN} a &= b \\end{ALIGN}"),
            "\\begin{aligned} a &= b \\end{aligned}"
        );
    }

    #[tokio::test]
    async fn second_render_is_served_from_cache() {
        let (renderer, engine) = renderer();

        let first = renderer.render("$x^2$", RenderMode::Math, true).await;
        let second = renderer.render("$x^2$", RenderMode::Math, true).await;

        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first.to_html(), second.to_html());
        assert!(!first.formulas().next().unwrap().cached);
        assert!(second.formulas().next().unwrap().cached);
        assert_eq!(renderer.cache_stats().hits, 1);
    }

    #[tokio::test]
    async fn display_flag_is_part_of_the_key() {
        let (renderer, engine) = renderer();

        renderer.render_formula("x", true).await.unwrap();
        renderer.render_formula("x", false).await.unwrap();

        assert_eq!(engine.calls.load(Ordering::SeqCst), 2);
        assert_eq!(renderer.cache_stats().size, 2);
    }

    #[tokio::test]
    async fn environments_force_display_mode() {
        let (renderer, engine) = renderer();

        let matrix = renderer
            .render_formula("\\begin{pmatrix}1&0\\\\0&1\\end{pmatrix}", true)
            .await
            .unwrap();
        assert!(matrix.display_mode);

        let aligned = renderer
            .render_formula("\\begin{align*} a &= b \\end{align*}", true)
            .await
            .unwrap();
        assert!(aligned.display_mode);

        let plain = renderer.render_formula("a + b", true).await.unwrap();
        assert!(!plain.display_mode);

        let sources = engine.sources.lock().unwrap();
        assert_eq!(sources[1].0, "\\begin{aligned} a &= b \\end{aligned}");
    }

    #[tokio::test]
    async fn empty_content_renders_nothing() {
        let (renderer, engine) = renderer();

        assert!(renderer.render("", RenderMode::Math, false).await.is_empty());
        assert!(renderer.render_formula("   ", true).await.is_none());
        assert!(renderer.render("", RenderMode::Auto, false).await.is_empty());
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn engine_failure_falls_back_to_source() {
        let (renderer, engine) = renderer();
        engine.fail.store(true, Ordering::SeqCst);

        let input = "\\frac{1}{";
        let formula = renderer.render_formula(input, false).await.unwrap();
        assert!(formula.error);
        assert_eq!(formula.html, input);

        // Failures are not cached
        assert_eq!(renderer.cache_stats().size, 0);
        engine.fail.store(false, Ordering::SeqCst);
        let retried = renderer.render_formula(input, false).await.unwrap();
        assert!(!retried.error);
    }

    #[tokio::test]
    async fn unavailable_engine_falls_back_without_retrying() {
        let (renderer, engine, loader) = renderer_with(&Config::default(), false);

        let markup = renderer.render("$a$ and $b$", RenderMode::Auto, true).await;
        assert!(markup.has_errors());
        assert_eq!(
            markup.to_html(),
            "<span class=\"math-fallback\">a</span> and <span class=\"math-fallback\">b</span>"
        );
        assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
        assert_eq!(renderer.engine_status(), LoadStatus::Failed);

        let err = renderer.preload().await.unwrap_err();
        assert!(matches!(err, MathError::EngineUnavailable(_)));
        assert_eq!(loader.loads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn fallback_source_renders_as_text() {
        let (renderer, _engine, _loader) = renderer_with(&Config::default(), false);

        let markup = renderer.render("if $a<b$ then", RenderMode::Auto, true).await;
        assert_eq!(
            markup.to_html(),
            "if <span class=\"math-fallback\">a&lt;b</span> then"
        );

        let markup = renderer
            .render("<script>alert(1)</script>", RenderMode::Math, false)
            .await;
        assert!(markup.has_errors());
        assert!(!markup.to_html().contains("<script>"));
    }

    #[tokio::test]
    async fn auto_inline_fraction_end_to_end() {
        let (renderer, engine) = renderer();
        let input = "$\\frac{1}{2}$";

        let markup = renderer.render(input, RenderMode::Auto, true).await;

        assert_eq!(markup.fragments.len(), 1);
        let formula = markup.formulas().next().unwrap();
        assert!(!formula.error);
        assert!(!formula.display_mode);
        assert_eq!(
            engine.sources.lock().unwrap().as_slice(),
            &[("\\frac{1}{2}".to_string(), false)]
        );
        let html = markup.to_html();
        assert!(!html.is_empty());
        assert_ne!(html, input);
    }

    #[tokio::test]
    async fn mixed_mode_keeps_text_and_order() {
        let (renderer, _engine) = renderer();

        let markup = renderer
            .render("text $a$ more $$b$$ end", RenderMode::Mixed, true)
            .await;

        assert_eq!(
            markup.to_html(),
            "text <span class=\"katex\">a</span> more <div class=\"katex\">b</div> end"
        );
    }

    #[tokio::test]
    async fn auto_routes_bare_environment_to_math() {
        let (renderer, engine) = renderer();

        let markup = renderer
            .render("\\begin{cases} 1 & x > 0 \\\\ 0 & x \\le 0 \\end{cases}", RenderMode::Auto, true)
            .await;

        assert_eq!(markup.fragments.len(), 1);
        assert!(markup.formulas().next().unwrap().display_mode);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn text_mode_is_verbatim() {
        let (renderer, engine) = renderer();

        let markup = renderer.render("costs $5 and $6", RenderMode::Text, false).await;
        assert_eq!(markup.to_html(), "costs $5 and $6");
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn eviction_forces_rerender_of_first_key() {
        let mut config = Config::default();
        config.cache.max_size = 3;
        let (renderer, engine, _) = renderer_with(&config, true);

        for i in 0..4 {
            renderer.render_formula(&format!("x_{i}"), true).await;
        }
        assert_eq!(renderer.cache_stats().size, 3);

        let again = renderer.render_formula("x_0", true).await.unwrap();
        assert!(!again.cached);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn disabled_cache_always_renders() {
        let mut config = Config::default();
        config.cache.enabled = false;
        let (renderer, engine, _) = renderer_with(&config, true);

        renderer.render_formula("y", true).await;
        renderer.render_formula("y", true).await;
        assert_eq!(engine.calls.load(Ordering::SeqCst), 2);
        assert_eq!(renderer.cache_stats().max_size, 0);
    }

    #[tokio::test]
    async fn clear_cache_empties_it() {
        let (renderer, engine) = renderer();

        renderer.render_formula("z", true).await;
        renderer.clear_cache();
        assert_eq!(renderer.cache_stats().size, 0);

        renderer.render_formula("z", true).await;
        assert_eq!(engine.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn warmup_counts_and_skips_failures() {
        let (renderer, engine) = renderer();
        let seen = AtomicUsize::new(0);

        let report = renderer
            .warmup(["a^2", "a^2", "", "b"], true, &|_| {
                seen.fetch_add(1, Ordering::SeqCst);
            })
            .await;
        assert_eq!(
            report,
            WarmupReport {
                rendered: 2,
                cached: 1,
                failed: 0,
                skipped: 1
            }
        );
        assert_eq!(seen.load(Ordering::SeqCst), 4);

        engine.fail.store(true, Ordering::SeqCst);
        let report = renderer.warmup(vec!["c".to_string()], true, &|_| {}).await;
        assert_eq!(report.failed, 1);

        // Warmed formulas are cache hits for later renders
        let hit = renderer.render_formula("$a^2$", true).await.unwrap();
        assert!(hit.cached);
    }

    #[tokio::test]
    async fn concurrent_renders_share_one_engine_load() {
        let (renderer, engine, loader) = renderer_with(&Config::default(), true);

        let (a, b, c) = tokio::join!(
            renderer.render_formula("p", true),
            renderer.render_formula("q", true),
            renderer.render_formula("r", false)
        );
        assert!(a.is_some() && b.is_some() && c.is_some());
        assert_eq!(loader.loads.load(Ordering::SeqCst), 1);
        assert_eq!(engine.calls.load(Ordering::SeqCst), 3);
        assert_eq!(renderer.loaded_engine().unwrap().engine_name(), "fake");
        assert_eq!(renderer.backend_name(), "fake");
    }
}
