//! The sequential reconciliation loop.

use crate::installer::{Installer, PackageRef};
use crate::manifest::ManifestEntry;
use crate::release::{AssetMatcher, ReleaseResolver};
use crate::state::InstalledState;
use crate::ui::{Prompt, UserInterface};

use super::{decide, Action, ItemReport, ItemStatus, RunReport};

/// Run-wide switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Treat every confirmation as answered "yes".
    pub assume_yes: bool,
    /// Report decisions without prompting, installing or recording.
    pub dry_run: bool,
}

/// Reconciles manifest entries against installed state.
///
/// Entries are processed one at a time in manifest order, and all prompts
/// for one entry are answered before the next entry is resolved.
pub struct ReconciliationEngine<R> {
    resolver: R,
    matcher: AssetMatcher,
    options: RunOptions,
}

impl<R: ReleaseResolver> ReconciliationEngine<R> {
    /// Create an engine with the default asset suffixes and options.
    pub fn new(resolver: R) -> Self {
        Self {
            resolver,
            matcher: AssetMatcher::default(),
            options: RunOptions::default(),
        }
    }

    /// Use a custom asset matcher.
    pub fn with_matcher(mut self, matcher: AssetMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Set run options.
    pub fn with_options(mut self, options: RunOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> RunOptions {
        self.options
    }

    /// Process every entry, updating `state` for each confirmed and
    /// successfully applied action.
    ///
    /// Per-entry failures are reported and skipped; they never abort the run.
    pub fn run(
        &self,
        entries: &[ManifestEntry],
        state: &mut InstalledState,
        ui: &mut dyn UserInterface,
        installer: &mut dyn Installer,
    ) -> RunReport {
        let mut report = RunReport::new();
        for entry in entries {
            let item = self.reconcile_entry(entry, state, ui, installer);
            tracing::debug!("{} -> {:?}", item.entry, item.status);
            report.push(item);
        }
        report
    }

    fn reconcile_entry(
        &self,
        entry: &ManifestEntry,
        state: &mut InstalledState,
        ui: &mut dyn UserInterface,
        installer: &mut dyn Installer,
    ) -> ItemReport {
        let repo = match entry.repo_id() {
            Ok(repo) => repo,
            Err(e) => {
                tracing::debug!("Skipping manifest line {}: {}", entry.line_number, e);
                ui.warning(&format!("Line {}: {}", entry.line_number, e));
                return ItemReport {
                    entry: entry.raw.clone(),
                    package: None,
                    availability: None,
                    status: ItemStatus::Skipped {
                        reason: e.to_string(),
                    },
                };
            }
        };

        let name = repo.package_name().to_string();
        let mut item = ItemReport {
            entry: entry.raw.clone(),
            package: Some(name.clone()),
            availability: None,
            status: ItemStatus::NoRelease,
        };

        let mut spinner = ui.start_spinner(&format!("Checking {}", repo));
        let release = match self.resolver.resolve(&repo) {
            Ok(release) => {
                spinner.finish_clear();
                release
            }
            Err(e) => {
                spinner.finish_clear();
                tracing::debug!("Skipping {}: {}", repo, e);
                ui.error(&e.to_string());
                item.status = ItemStatus::Skipped {
                    reason: e.to_string(),
                };
                return item;
            }
        };

        let mut asset = None;
        if release.has_release() {
            let availability = self.matcher.check(&release);
            let line = availability.describe();
            ui.message(&format!(
                "{}: latest release {} ({})",
                repo, release.tag_name, line
            ));
            if ui.output_mode().shows_detail() && availability.available {
                ui.message(&format!("  assets: {}", availability.asset_names.join(", ")));
            }
            asset = availability.matched_asset;
            item.availability = Some(line);
        }

        let installed = state.lookup(&name).map(str::to_string);
        let action = decide(installed.as_deref(), &release.tag_name);

        item.status = match action {
            Action::NoRelease => {
                ui.message(&format!("{} has no published release", repo));
                ItemStatus::NoRelease
            }
            Action::UpToDate { version } => {
                ui.success(&format!("{} {} is up to date", name, version));
                ItemStatus::UpToDate { version }
            }
            action => {
                let pkg = PackageRef {
                    repo,
                    name,
                    version: release.tag_name,
                    asset,
                };
                self.apply(action, &pkg, state, ui, installer)
            }
        };
        item
    }

    /// Offer, confirm and carry out an install or update.
    fn apply(
        &self,
        action: Action,
        pkg: &PackageRef,
        state: &mut InstalledState,
        ui: &mut dyn UserInterface,
        installer: &mut dyn Installer,
    ) -> ItemStatus {
        let (notice, prompt) = match &action {
            Action::Update { installed, latest } => (
                format!("Update available for {}: {} → {}", pkg.name, installed, latest),
                Prompt::new(
                    format!("update_{}", pkg.name),
                    format!("Update {} from {} to {}?", pkg.name, installed, latest),
                ),
            ),
            _ => (
                format!("{} is not installed, latest release is {}", pkg.name, pkg.version),
                Prompt::new(
                    format!("install_{}", pkg.name),
                    format!("Install {} {}?", pkg.name, pkg.version),
                ),
            ),
        };
        ui.message(&notice);

        if self.options.dry_run {
            return ItemStatus::Planned { action };
        }

        let confirmed = if self.options.assume_yes {
            true
        } else {
            match ui.confirm(&prompt) {
                Ok(answer) => answer,
                Err(e) => {
                    ui.error(&format!("Could not ask about {}: {}", pkg.name, e));
                    return ItemStatus::Failed {
                        action,
                        error: e.to_string(),
                    };
                }
            }
        };

        if !confirmed {
            tracing::debug!("Declined {} for {}", action, pkg.name);
            return ItemStatus::Declined { action };
        }

        let result = match &action {
            Action::Update { installed, .. } => installer.update(pkg, installed),
            _ => installer.install(pkg),
        };
        if let Err(e) = result {
            tracing::debug!("Installer failed for {}: {}", pkg.name, e);
            ui.error(&format!("Failed to {} {}: {}", verb(&action), pkg.name, e));
            return ItemStatus::Failed {
                action,
                error: e.to_string(),
            };
        }

        state.upsert(&pkg.name, &pkg.version);
        match action {
            Action::Update { installed, latest } => {
                ui.success(&format!("Updated {} {} → {}", pkg.name, installed, latest));
                ItemStatus::Updated {
                    from: installed,
                    to: latest,
                }
            }
            _ => {
                ui.success(&format!("Installed {} {}", pkg.name, pkg.version));
                ItemStatus::Installed {
                    version: pkg.version.clone(),
                }
            }
        }
    }
}

fn verb(action: &Action) -> &'static str {
    match action {
        Action::Update { .. } => "update",
        _ => "install",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ReltrackError, Result};
    use crate::installer::{InstallCall, MockInstaller};
    use crate::manifest::{Manifest, RepoId};
    use crate::release::ReleaseInfo;
    use crate::ui::MockUI;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Resolver serving canned releases; unknown repositories fail.
    #[derive(Default)]
    struct FakeResolver {
        releases: HashMap<String, ReleaseInfo>,
        queried: RefCell<Vec<String>>,
    }

    impl FakeResolver {
        fn with(mut self, repo: &str, tag: &str, assets: &[&str]) -> Self {
            self.releases.insert(
                repo.to_string(),
                ReleaseInfo::new(tag, assets.iter().map(|a| a.to_string()).collect()),
            );
            self
        }

        fn queried(&self) -> Vec<String> {
            self.queried.borrow().clone()
        }
    }

    impl ReleaseResolver for FakeResolver {
        fn resolve(&self, repo: &RepoId) -> Result<ReleaseInfo> {
            self.queried.borrow_mut().push(repo.to_string());
            self.releases
                .get(&repo.to_string())
                .cloned()
                .ok_or_else(|| ReltrackError::transient(repo.to_string(), "HTTP 500"))
        }
    }

    fn entries(text: &str) -> Vec<ManifestEntry> {
        Manifest::parse(text).entries().to_vec()
    }

    fn state(pairs: &[(&str, &str)]) -> InstalledState {
        let mut state = InstalledState::new();
        for (name, version) in pairs {
            state.upsert(name, version);
        }
        state
    }

    #[test]
    fn confirmed_install_records_version() {
        let resolver = FakeResolver::default().with("octo/widget", "v2.0.0", &["widget.tar.gz"]);
        let engine = ReconciliationEngine::new(&resolver);
        let mut state = InstalledState::new();
        let mut ui = MockUI::new();
        ui.set_prompt_response("install_widget", "yes");
        let mut installer = MockInstaller::new();

        let report = engine.run(&entries("octo/widget"), &mut state, &mut ui, &mut installer);

        assert_eq!(state.lookup("widget"), Some("v2.0.0"));
        assert_eq!(report.installed(), 1);
        assert_eq!(ui.prompts_shown(), &["install_widget".to_string()]);
        assert!(ui.has_message("widget is not installed, latest release is v2.0.0"));
        assert!(ui.has_message("binary: widget.tar.gz"));
        assert_eq!(
            installer.calls(),
            &[InstallCall::Install {
                name: "widget".into(),
                version: "v2.0.0".into()
            }]
        );
    }

    #[test]
    fn declined_update_leaves_state_untouched() {
        let resolver = FakeResolver::default().with("octo/widget", "v2.0.0", &[]);
        let engine = ReconciliationEngine::new(&resolver);
        let mut state = state(&[("widget", "v1.0.0")]);
        let mut ui = MockUI::new();
        ui.set_prompt_response("update_widget", "no");
        let mut installer = MockInstaller::new();

        let report = engine.run(&entries("octo/widget"), &mut state, &mut ui, &mut installer);

        assert_eq!(state.lookup("widget"), Some("v1.0.0"));
        assert_eq!(report.declined(), 1);
        assert!(ui.has_message("Update available for widget: v1.0.0 → v2.0.0"));
        assert!(installer.calls().is_empty());
    }

    #[test]
    fn confirmed_update_replaces_version_in_place() {
        let resolver = FakeResolver::default().with("octo/widget", "v2.0.0", &[]);
        let engine = ReconciliationEngine::new(&resolver);
        let mut state = state(&[("widget", "v1.0.0"), ("gadget", "v3")]);
        let mut ui = MockUI::new();
        ui.set_prompt_response("update_widget", "y");
        let mut installer = MockInstaller::new();

        let report = engine.run(&entries("octo/widget"), &mut state, &mut ui, &mut installer);

        assert_eq!(report.updated(), 1);
        assert_eq!(state.len(), 2);
        assert_eq!(state.packages()[0].name, "widget");
        assert_eq!(state.lookup("widget"), Some("v2.0.0"));
        assert_eq!(
            installer.calls(),
            &[InstallCall::Update {
                name: "widget".into(),
                from: "v1.0.0".into(),
                version: "v2.0.0".into()
            }]
        );
    }

    #[test]
    fn up_to_date_asks_nothing() {
        let resolver = FakeResolver::default().with("octo/widget", "v2.0.0", &[]);
        let engine = ReconciliationEngine::new(&resolver);
        let mut state = state(&[("widget", "v2.0.0")]);
        let mut ui = MockUI::new();
        let mut installer = MockInstaller::new();

        let report = engine.run(&entries("octo/widget"), &mut state, &mut ui, &mut installer);

        assert_eq!(report.up_to_date(), 1);
        assert!(ui.prompts_shown().is_empty());
        assert!(ui.has_success("widget v2.0.0 is up to date"));
        assert!(installer.calls().is_empty());
    }

    #[test]
    fn no_release_is_a_no_op() {
        let resolver = FakeResolver::default().with("octo/widget", "", &[]);
        let engine = ReconciliationEngine::new(&resolver);
        let mut state = InstalledState::new();
        let mut ui = MockUI::new();
        let mut installer = MockInstaller::new();

        let report = engine.run(&entries("octo/widget"), &mut state, &mut ui, &mut installer);

        assert_eq!(report.no_release(), 1);
        assert!(state.is_empty());
        assert!(ui.prompts_shown().is_empty());
        assert!(ui.has_message("octo/widget has no published release"));
        assert!(!ui.has_message("is not installed"));
        assert!(installer.calls().is_empty());
    }

    #[test]
    fn no_release_keeps_existing_record() {
        let resolver = FakeResolver::default().with("octo/widget", "", &[]);
        let engine = ReconciliationEngine::new(&resolver);
        let mut state = state(&[("widget", "v1.0.0")]);
        let mut ui = MockUI::new();
        let mut installer = MockInstaller::new();

        engine.run(&entries("octo/widget"), &mut state, &mut ui, &mut installer);

        assert_eq!(state.lookup("widget"), Some("v1.0.0"));
        assert!(ui.prompts_shown().is_empty());
    }

    #[test]
    fn resolution_failure_skips_only_that_entry() {
        let resolver = FakeResolver::default().with("octo/gadget", "v1", &[]);
        let engine = ReconciliationEngine::new(&resolver);
        let mut state = state(&[("broken", "v0")]);
        let mut ui = MockUI::new();
        ui.set_default_prompt_response("yes");
        let mut installer = MockInstaller::new();

        let report = engine.run(
            &entries("octo/broken\nocto/gadget"),
            &mut state,
            &mut ui,
            &mut installer,
        );

        assert_eq!(report.skipped(), 1);
        assert_eq!(report.installed(), 1);
        assert!(ui.has_error("octo/broken"));
        assert_eq!(state.lookup("broken"), Some("v0"));
        assert_eq!(state.lookup("gadget"), Some("v1"));
    }

    #[test]
    fn malformed_line_is_skipped_without_query() {
        let resolver = FakeResolver::default().with("octo/widget", "v1", &[]);
        let engine = ReconciliationEngine::new(&resolver);
        let mut state = InstalledState::new();
        let mut ui = MockUI::new();
        ui.set_default_prompt_response("yes");
        let mut installer = MockInstaller::new();

        let report = engine.run(
            &entries("not-a-repo\nocto/widget/extra\nocto/widget"),
            &mut state,
            &mut ui,
            &mut installer,
        );

        assert_eq!(report.skipped(), 2);
        assert_eq!(resolver.queried(), vec!["octo/widget".to_string()]);
        assert!(ui.has_warning("Line 1"));
        assert!(ui.has_warning("Line 2"));
        assert_eq!(report.items()[0].package, None);
        assert_eq!(state.lookup("widget"), Some("v1"));
    }

    #[test]
    fn entries_processed_in_manifest_order() {
        let resolver = FakeResolver::default()
            .with("octo/b", "v1", &[])
            .with("octo/a", "v1", &[])
            .with("octo/c", "v1", &[]);
        let engine = ReconciliationEngine::new(&resolver);
        let mut state = InstalledState::new();
        let mut ui = MockUI::new();
        ui.set_default_prompt_response("yes");
        let mut installer = MockInstaller::new();

        engine.run(&entries("octo/b\nocto/a\nocto/c"), &mut state, &mut ui, &mut installer);

        assert_eq!(resolver.queried(), vec!["octo/b", "octo/a", "octo/c"]);
        assert_eq!(
            ui.prompts_shown(),
            &["install_b".to_string(), "install_a".into(), "install_c".into()]
        );
        let names: Vec<_> = state.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn unanswered_prompt_defaults_to_no() {
        let resolver = FakeResolver::default().with("octo/widget", "v1", &[]);
        let engine = ReconciliationEngine::new(&resolver);
        let mut state = InstalledState::new();
        let mut ui = MockUI::new();
        let mut installer = MockInstaller::new();

        let report = engine.run(&entries("octo/widget"), &mut state, &mut ui, &mut installer);

        assert_eq!(report.declined(), 1);
        assert!(state.is_empty());
    }

    #[test]
    fn assume_yes_skips_prompts() {
        let resolver = FakeResolver::default()
            .with("octo/widget", "v2", &[])
            .with("octo/gadget", "v5", &[]);
        let engine = ReconciliationEngine::new(&resolver).with_options(RunOptions {
            assume_yes: true,
            dry_run: false,
        });
        let mut state = state(&[("widget", "v1")]);
        let mut ui = MockUI::new();
        let mut installer = MockInstaller::new();

        let report = engine.run(
            &entries("octo/widget\nocto/gadget"),
            &mut state,
            &mut ui,
            &mut installer,
        );

        assert!(ui.prompts_shown().is_empty());
        assert_eq!(report.updated(), 1);
        assert_eq!(report.installed(), 1);
        assert_eq!(state.lookup("widget"), Some("v2"));
        assert_eq!(state.lookup("gadget"), Some("v5"));
    }

    #[test]
    fn dry_run_changes_nothing() {
        let resolver = FakeResolver::default()
            .with("octo/widget", "v2", &[])
            .with("octo/gadget", "v5", &[]);
        let engine = ReconciliationEngine::new(&resolver).with_options(RunOptions {
            assume_yes: true,
            dry_run: true,
        });
        let mut state = state(&[("widget", "v1")]);
        let before = state.clone();
        let mut ui = MockUI::new();
        let mut installer = MockInstaller::new();

        let report = engine.run(
            &entries("octo/widget\nocto/gadget"),
            &mut state,
            &mut ui,
            &mut installer,
        );

        assert_eq!(report.planned(), 2);
        assert!(!report.changed_state());
        assert_eq!(state, before);
        assert!(ui.prompts_shown().is_empty());
        assert!(installer.calls().is_empty());
    }

    #[test]
    fn installer_failure_records_nothing() {
        let resolver = FakeResolver::default()
            .with("octo/widget", "v2", &[])
            .with("octo/gadget", "v5", &[]);
        let engine = ReconciliationEngine::new(&resolver);
        let mut state = InstalledState::new();
        let mut ui = MockUI::new();
        ui.set_default_prompt_response("yes");
        let mut installer = MockInstaller::new();
        installer.fail_for("widget");

        let report = engine.run(
            &entries("octo/widget\nocto/gadget"),
            &mut state,
            &mut ui,
            &mut installer,
        );

        assert_eq!(report.failed(), 1);
        assert_eq!(report.installed(), 1);
        assert_eq!(state.lookup("widget"), None);
        assert_eq!(state.lookup("gadget"), Some("v5"));
        assert!(ui.has_error("Failed to install widget"));
    }

    #[test]
    fn installer_receives_matched_asset() {
        struct Recording(Vec<Option<String>>);
        impl Installer for Recording {
            fn install(&mut self, pkg: &PackageRef) -> Result<()> {
                self.0.push(pkg.asset.clone());
                Ok(())
            }
            fn update(&mut self, pkg: &PackageRef, _from: &str) -> Result<()> {
                self.0.push(pkg.asset.clone());
                Ok(())
            }
        }

        let resolver = FakeResolver::default().with(
            "octo/widget",
            "v2",
            &["checksums.txt", "widget.zip", "widget.tar.gz"],
        );
        let engine = ReconciliationEngine::new(&resolver).with_options(RunOptions {
            assume_yes: true,
            dry_run: false,
        });
        let mut state = InstalledState::new();
        let mut ui = MockUI::new();
        let mut installer = Recording(Vec::new());

        let report = engine.run(&entries("octo/widget"), &mut state, &mut ui, &mut installer);

        assert_eq!(installer.0, vec![Some("widget.zip".to_string())]);
        assert_eq!(
            report.item("widget").and_then(|i| i.availability.as_deref()),
            Some("binary: widget.zip")
        );
    }

    #[test]
    fn verbose_mode_lists_all_assets() {
        let resolver =
            FakeResolver::default().with("octo/widget", "v2", &["notes.txt", "widget.zip"]);
        let engine = ReconciliationEngine::new(&resolver);
        let mut state = state(&[("widget", "v2")]);
        let mut installer = MockInstaller::new();

        let mut quiet = MockUI::new();
        engine.run(&entries("octo/widget"), &mut state, &mut quiet, &mut installer);
        assert!(!quiet.has_message("assets: notes.txt, widget.zip"));

        let mut verbose = MockUI::with_mode(crate::ui::OutputMode::Verbose);
        engine.run(&entries("octo/widget"), &mut state, &mut verbose, &mut installer);
        assert!(verbose.has_message("assets: notes.txt, widget.zip"));
    }

    #[test]
    fn mixed_manifest_end_to_end() {
        let resolver = FakeResolver::default()
            .with("octo/fresh", "v1", &["fresh.tar.gz"])
            .with("octo/stale", "v3", &[])
            .with("octo/current", "v7", &[])
            .with("octo/empty", "", &[]);
        let engine = ReconciliationEngine::new(&resolver);
        let mut state = state(&[("stale", "v2"), ("current", "v7")]);
        let mut ui = MockUI::new();
        ui.set_prompt_response("install_fresh", "yes");
        ui.set_prompt_response("update_stale", "no");
        let mut installer = MockInstaller::new();

        let report = engine.run(
            &entries("# tools\nocto/fresh\n\nocto/stale\nocto/current\nocto/empty\nocto/missing\n"),
            &mut state,
            &mut ui,
            &mut installer,
        );

        assert_eq!(report.items().len(), 5);
        assert_eq!(report.installed(), 1);
        assert_eq!(report.declined(), 1);
        assert_eq!(report.up_to_date(), 1);
        assert_eq!(report.no_release(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(
            state.to_map().into_iter().collect::<Vec<_>>(),
            vec![
                ("current".to_string(), "v7".to_string()),
                ("fresh".to_string(), "v1".to_string()),
                ("stale".to_string(), "v2".to_string()),
            ]
        );
        assert_eq!(
            report.to_string(),
            "1 installed, 1 up to date, 1 without release, 1 declined, 1 skipped"
        );
    }
}
