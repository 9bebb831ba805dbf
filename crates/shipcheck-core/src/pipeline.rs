//! Per-platform verification pipeline.
//!
//! Each platform runs locate → validate → stage → smoke-test to completion
//! before the next one starts. Under `FailurePolicy::CollectAll` every
//! platform is processed; under `FailurePolicy::FailFast` the first failure
//! stops the run and the remaining platforms are recorded as skipped.

use anyhow::Result;
use log::{error, info, warn};

use crate::artifact::locate::locate;
use crate::artifact::stage::Stager;
use crate::artifact::validate::validate;
use crate::artifact::{ArtifactCandidate, fingerprint};
use crate::config::{FailurePolicy, VerifyConfig};
use crate::error::VerifyError;
use crate::platform::PlatformTarget;
use crate::report::model::{
    PlatformResult, Report, RunInfo, StagedAsset, ToolInfo, VerificationReport,
};
use crate::smoke::{HELP_ARGS, SmokeTester, VERSION_ARGS};

/// Verify every configured platform and produce the final report.
///
/// Platform failures are recorded in the report, never returned. An error
/// is returned only when the run cannot start at all (for example an
/// invalid version string).
pub fn verify(config: &VerifyConfig, tool: ToolInfo) -> Result<Report> {
    let stager = Stager::new(&config.product_name, &config.version, &config.output_dir)?;
    let tester = SmokeTester::new(config.smoke_timeout);
    let mut report = VerificationReport::new();

    info!(
        "verifying {} version {} for {} platform(s)",
        config.product_name,
        config.version,
        config.platforms.len()
    );

    let mut platforms = dedup(&config.platforms).into_iter();
    while let Some(platform) = platforms.next() {
        let mut entry = PlatformResult::new(platform);
        let outcome = verify_platform(config, platform, &stager, &tester, &mut entry);

        match &outcome {
            Ok(()) => info!("{platform}: passed"),
            Err(e) => error!("{platform}: {e}"),
        }
        report.record(entry, outcome);

        if config.failure_policy == FailurePolicy::FailFast && report.has_failures() {
            for rest in platforms.by_ref() {
                warn!("{rest}: skipped after earlier failure");
                report.record_skipped(rest);
            }
            break;
        }
    }

    Ok(report.finalize(tool, RunInfo::from(config)))
}

fn verify_platform(
    config: &VerifyConfig,
    platform: PlatformTarget,
    stager: &Stager,
    tester: &SmokeTester,
    entry: &mut PlatformResult,
) -> crate::error::Result<()> {
    let candidate = locate(&config.search_root(platform), &config.product_name, platform)?;
    entry.artifact = Some(candidate.path.display().to_string());

    let validation = validate(&candidate, config.min_size);
    let failure = validation.failure.clone();
    entry.validation = Some(validation);
    if let Some(failure) = failure {
        return Err(VerifyError::Validation { platform, failure });
    }

    let staged_path = stager.stage(&candidate)?;

    // The staged copy is what gets released, so it is checked again.
    let staged = ArtifactCandidate {
        path: staged_path.clone(),
        platform,
    };
    let staged_validation = validate(&staged, config.min_size);
    if let Some(failure) = staged_validation.failure.clone() {
        entry.validation = Some(staged_validation);
        return Err(VerifyError::Validation { platform, failure });
    }

    let hash = match fingerprint(&staged_path) {
        Ok(hash) => Some(hash),
        Err(e) => {
            warn!("{platform}: {e:#}");
            None
        }
    };
    entry.staged = Some(StagedAsset {
        path: staged_path.display().to_string(),
        file_name: stager.staged_filename(platform),
        size_bytes: staged_validation.size_bytes.unwrap_or_default(),
        hash,
    });

    if !config.smoke_scope.includes(platform) {
        info!("{platform}: smoke test skipped");
        entry.smoke_skipped = true;
        return Ok(());
    }

    let help = tester.smoke_test(&staged_path, HELP_ARGS)?;
    let help_check = help.check(tester.timeout());
    entry.smoke.push(help);
    help_check?;

    match tester.smoke_test(&staged_path, VERSION_ARGS) {
        Ok(version) => {
            if let Err(e) = version.check(tester.timeout()) {
                warn!("{platform}: {e}");
                entry.warnings.push(e.to_string());
            }
            entry.smoke.push(version);
        }
        Err(e) => {
            warn!("{platform}: {e}");
            entry.warnings.push(e.to_string());
        }
    }

    Ok(())
}

/// Drop repeated platforms, keeping first occurrences in order.
fn dedup(platforms: &[PlatformTarget]) -> Vec<PlatformTarget> {
    let mut seen = Vec::with_capacity(platforms.len());
    for &p in platforms {
        if seen.contains(&p) {
            warn!("{p}: listed more than once, verifying it once");
        } else {
            seen.push(p);
        }
    }
    seen
}
