//! Charm-style CLI prompts driving the provisioning pipeline

use crate::exec::{self, CommandSpec};
use crate::pipeline::{run_step, FailureMode};
use crate::product::StarterConfig;
use crate::project::{self, app_json, git, install, package_json};
use crate::runtime::{self, check};
use crate::templates::{copier, fetcher::TemplateFetcher, version, TemplateManifest};
use crate::validate;
use anyhow::Result;
use std::path::PathBuf;

/// CLI arguments for the create flow
#[derive(Debug, Clone)]
pub struct CreateArgs {
    /// Name of the application to create
    pub app_name: String,

    /// Reverse-DNS package identifier (prompted when absent or invalid)
    pub package_id: Option<String>,

    /// Template name to use
    pub template: Option<String>,

    /// Local directory to use for templates instead of fetching from remote
    pub template_dir: Option<PathBuf>,

    /// Deep-link scheme (prompted when absent or invalid)
    pub scheme: Option<String>,

    /// Universal-link domain (prompted when absent)
    pub domain: Option<String>,

    /// Skip native directory generation
    pub skip_prebuild: bool,

    /// Skip dependency group installation
    pub skip_install: bool,

    /// Auto-confirm all prompts (non-interactive mode)
    pub yes: bool,
}

/// Run the full provisioning flow with interactive prompts
pub async fn run<C: StarterConfig>(config: &C, args: CreateArgs, cli_version: &str) -> Result<()> {
    cliclack::intro(config.display_name())?;

    // Step 1: Validate the app name before anything is created
    if !validate::is_valid_app_name(&args.app_name) {
        cliclack::log::error(format!(
            "'{}' is not a valid app name: start with a letter, 3-50 characters \
             (letters, digits, spaces, '-', '_')",
            args.app_name
        ))?;
        anyhow::bail!("Invalid app name '{}'", args.app_name);
    }
    let slug = validate::slugify(&args.app_name);

    // Step 2: Probe the external toolchain
    let toolchain = check_toolchain_step(&args).await?;

    // Step 3: Setup template fetcher and select template
    let mut fetcher = setup_fetcher(config, &args.template_dir)?;
    let (template_name, manifest) =
        select_template(&mut fetcher, args.template.as_deref()).await?;
    manifest.validate_paths()?;

    if let Some(warning) =
        version::check_compatibility(cli_version, &manifest.version, config.upgrade_command())
    {
        cliclack::log::warning(format!(
            "Version warning: {}",
            warning.lines().next().unwrap_or(&warning)
        ))?;
    }

    // Step 4: Resolve identity values (prompting where flags are absent)
    let package_id = resolve_package_id(&args)?;
    let scheme = resolve_scheme(&args)?;
    let domain = resolve_domain(&args)?;

    // Step 5: Scaffold the base project
    let project_dir = confirm_project_dir(&args)?;
    let scaffold_cmd = config.scaffold_command(&args.app_name);
    run_step("scaffold", FailureMode::Fatal, || async {
        exec::run_streamed(&scaffold_cmd, None).await
    })
    .await?;

    // Step 6: Clean scaffolder output and apply the template overlay
    let spinner = cliclack::spinner();
    spinner.start("Applying template...");
    let removed = copier::clean_project(&project_dir, &manifest).await?;
    let copied = copier::copy_overlay(&mut fetcher, &template_name, &manifest, &project_dir).await?;
    spinner.stop(format!(
        "Template applied: {} paths cleaned, {} files copied",
        removed.len(),
        copied.len()
    ));

    // Step 7: Merge the package.json overlay
    if let Some(overlay) =
        copier::fetch_package_overlay(&mut fetcher, &template_name, &manifest).await?
    {
        let package_path = project_dir.join("package.json");
        let mut package = project::load_json(&package_path).await?;
        package_json::merge_overlay(&mut package, &overlay);
        package_json::set_name(&mut package, &slug)?;
        project::save_json(&package_path, &package).await?;
        cliclack::log::success("package.json updated")?;
    }

    // Step 8: Patch app.json (identity, identifiers, deep links)
    patch_app_manifest(&project_dir, &args.app_name, &slug, &package_id, &scheme, &domain).await?;

    // Step 9: Optional native directory generation
    let prebuilt = maybe_prebuild(&args, &project_dir).await?;

    // Step 10: Reset git history
    if check::is_available(&toolchain, "git") {
        let message = git::commit_message(&args.app_name, &template_name, config.display_name());
        let status = run_step("git history reset", FailureMode::Warn, || async {
            git::reset_history(&project_dir, &message).await
        })
        .await?;
        if status.completed() {
            cliclack::log::success("Git history reset to a single initial commit")?;
        } else {
            cliclack::log::warning(
                "Recreate the history manually: git init && git add -A && git commit",
            )?;
        }
    } else {
        cliclack::log::warning("git is not installed; skipping history reset")?;
    }

    // Step 11: Install the fixed dependency groups
    if !args.skip_install {
        for group in config.dependency_groups() {
            let status = run_step(group.label, FailureMode::Warn, || async {
                install::install_group(&project_dir, &group).await
            })
            .await?;
            if !status.completed() {
                cliclack::log::warning(format!(
                    "Install the {} group manually: {}",
                    group.label,
                    group.command().display()
                ))?;
            }
        }
    } else {
        cliclack::log::info("Skipping dependency installation")?;
    }

    // Step 12: Show next steps
    print_next_steps(config, &project_dir, prebuilt)?;

    Ok(())
}

async fn check_toolchain_step(args: &CreateArgs) -> Result<Vec<check::ToolInfo>> {
    let spinner = cliclack::spinner();
    spinner.start("Checking toolchain...");
    let tools = check::check_toolchain();

    let summary: Vec<String> = tools
        .iter()
        .map(|t| {
            if t.available {
                format!("{} ({})", t.name, t.version.as_deref().unwrap_or("unknown"))
            } else {
                format!("{} (not installed)", t.name)
            }
        })
        .collect();
    spinner.stop(format!("Toolchain: {}", summary.join(", ")));

    let missing_names: Vec<&'static str> = check::missing_required(&tools)
        .iter()
        .map(|t| t.name)
        .collect();

    for tool in tools.iter().filter(|t| !t.required && !t.available) {
        cliclack::log::warning(format!(
            "{} is not installed; the related step will be skipped",
            tool.name
        ))?;
    }

    if missing_names.is_empty() {
        return Ok(tools);
    }

    cliclack::log::error(format!("Missing required tools: {}", missing_names.join(", ")))?;

    if args.yes {
        anyhow::bail!("Install Node.js and npm, then run this command again.");
    }

    let action: &str = cliclack::select("What would you like to do?")
        .item(
            "docs",
            format!("Open the Node.js download page ({})", runtime::NODE_DOWNLOAD_URL),
            "",
        )
        .item("abort", "Abort setup", "")
        .interact()?;

    if action == "docs" {
        open::that(runtime::NODE_DOWNLOAD_URL)?;
        cliclack::outro("After installing Node.js, run this command again.")?;
        std::process::exit(0);
    }

    anyhow::bail!("Setup cancelled.")
}

fn setup_fetcher<C: StarterConfig>(
    config: &C,
    template_dir: &Option<PathBuf>,
) -> Result<TemplateFetcher> {
    let fetcher = match template_dir {
        Some(path) => {
            cliclack::log::info(format!("Using local templates from {}", path.display()))?;
            TemplateFetcher::from_local(path.clone(), config.user_agent())
        }
        None => {
            cliclack::log::info("Using remote templates")?;
            TemplateFetcher::from_config(config)?
        }
    };

    Ok(fetcher)
}

async fn select_template(
    fetcher: &mut TemplateFetcher,
    specified_template: Option<&str>,
) -> Result<(String, TemplateManifest)> {
    let spinner = cliclack::spinner();
    spinner.start("Loading templates...");

    let root_manifest = fetcher.fetch_root_manifest().await?;

    // If a template was specified via --template flag, use it directly
    if let Some(template_name) = specified_template {
        if !root_manifest.templates.contains(&template_name.to_string()) {
            spinner.stop("Failed to load templates");
            let available = root_manifest.templates.join(", ");
            anyhow::bail!(
                "Template '{}' not found. Available templates: {}",
                template_name,
                available
            );
        }

        let manifest = fetcher.fetch_template_manifest(template_name).await?;
        spinner.stop(format!(
            "Template: {} - {}",
            manifest.name, manifest.description
        ));
        return Ok((template_name.to_string(), manifest));
    }

    let mut templates: Vec<(String, TemplateManifest)> = Vec::new();
    for template_name in &root_manifest.templates {
        let manifest = fetcher.fetch_template_manifest(template_name).await?;
        templates.push((template_name.clone(), manifest));
    }

    spinner.stop("Templates loaded");

    if templates.is_empty() {
        anyhow::bail!("No templates found.");
    }

    // If only one template, use it automatically
    if templates.len() == 1 {
        let (name, manifest) = templates.into_iter().next().expect("one template");
        cliclack::log::info(format!(
            "Using template: {} - {}",
            manifest.name, manifest.description
        ))?;
        return Ok((name, manifest));
    }

    // Build select prompt - use indices to avoid borrow issues
    let mut select = cliclack::select("Select a template");
    for (idx, (_, manifest)) in templates.iter().enumerate() {
        select = select.item(idx, &manifest.name, &manifest.description);
    }

    let selected_idx: usize = select.interact()?;
    let (name, manifest) = templates
        .into_iter()
        .nth(selected_idx)
        .expect("selected index in range");

    Ok((name, manifest))
}

fn resolve_package_id(args: &CreateArgs) -> Result<String> {
    let fallback = validate::default_package_id(&args.app_name);

    if let Some(id) = &args.package_id {
        if validate::is_valid_package_id(id) {
            cliclack::log::success(format!("Package identifier: {}", id))?;
            return Ok(id.clone());
        }
        cliclack::log::warning(format!(
            "'{}' is not a valid package identifier (expected reverse-DNS like {})",
            id, fallback
        ))?;
    }

    if args.yes {
        cliclack::log::info(format!("Using derived package identifier: {}", fallback))?;
        return Ok(fallback);
    }

    let id: String = cliclack::input("Package identifier (reverse-DNS)")
        .default_input(&fallback)
        .validate(|input: &String| {
            if validate::is_valid_package_id(input) {
                Ok(())
            } else {
                Err("Use at least two dot-separated lowercase segments, e.g. com.acme.myapp")
            }
        })
        .interact()?;

    Ok(id)
}

fn resolve_scheme(args: &CreateArgs) -> Result<String> {
    let fallback = validate::default_scheme(&args.app_name);

    if let Some(scheme) = &args.scheme {
        if validate::is_valid_scheme(scheme) {
            cliclack::log::success(format!("Deep-link scheme: {}", scheme))?;
            return Ok(scheme.clone());
        }
        cliclack::log::warning(format!(
            "'{}' is not a valid scheme (3-20 lowercase letters, digits, hyphens)",
            scheme
        ))?;
    }

    if args.yes {
        cliclack::log::info(format!("Using derived deep-link scheme: {}", fallback))?;
        return Ok(fallback);
    }

    let scheme: String = cliclack::input("Deep-link scheme")
        .default_input(&fallback)
        .validate(|input: &String| {
            if validate::is_valid_scheme(input) {
                Ok(())
            } else {
                Err("Use 3-20 lowercase letters, digits, or hyphens, starting with a letter")
            }
        })
        .interact()?;

    Ok(scheme)
}

fn resolve_domain(args: &CreateArgs) -> Result<Option<String>> {
    if let Some(domain) = &args.domain {
        if validate::is_valid_domain(domain) {
            cliclack::log::success(format!("Universal link domain: {}", domain))?;
            return Ok(Some(domain.clone()));
        }
        cliclack::log::warning(format!(
            "'{}' is not a valid domain; skipping universal links",
            domain
        ))?;
        return Ok(None);
    }

    // Universal links need a real domain; there is no derivable default
    if args.yes {
        return Ok(None);
    }

    let wants_links: bool = cliclack::confirm("Configure universal links (https deep links)?")
        .initial_value(false)
        .interact()?;
    if !wants_links {
        return Ok(None);
    }

    let domain: String = cliclack::input("Universal link domain")
        .placeholder("links.example.com")
        .validate(|input: &String| {
            if validate::is_valid_domain(input) {
                Ok(())
            } else {
                Err("Use a lowercase domain with a TLD, e.g. links.example.com")
            }
        })
        .interact()?;

    Ok(Some(domain))
}

fn confirm_project_dir(args: &CreateArgs) -> Result<PathBuf> {
    let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let project_dir = current_dir.join(&args.app_name);

    if project_dir.exists() {
        cliclack::log::warning(format!("{} already exists", project_dir.display()))?;

        let confirm = if args.yes {
            false
        } else {
            cliclack::confirm("Continue anyway? The scaffolder may refuse a non-empty directory.")
                .initial_value(false)
                .interact()?
        };

        if !confirm {
            anyhow::bail!("Setup cancelled.");
        }
    }

    Ok(project_dir)
}

async fn patch_app_manifest(
    project_dir: &PathBuf,
    app_name: &str,
    slug: &str,
    package_id: &str,
    scheme: &str,
    domain: &Option<String>,
) -> Result<()> {
    let app_json_path = project_dir.join("app.json");
    let mut app = project::load_json(&app_json_path).await?;

    app_json::set_identity(&mut app, app_name, slug)?;
    let removed = app_json::strip_account_fields(&mut app)?;
    app_json::set_package_identifiers(&mut app, package_id)?;
    app_json::set_scheme(&mut app, scheme)?;
    if let Some(domain) = domain {
        app_json::add_universal_links(&mut app, domain)?;
    }

    project::save_json(&app_json_path, &app).await?;

    if removed.is_empty() {
        cliclack::log::success("app.json configured")?;
    } else {
        cliclack::log::success(format!(
            "app.json configured (removed: {})",
            removed.join(", ")
        ))?;
    }

    Ok(())
}

async fn maybe_prebuild(args: &CreateArgs, project_dir: &PathBuf) -> Result<bool> {
    if args.skip_prebuild {
        cliclack::log::info("Skipping native directory generation")?;
        return Ok(false);
    }

    let confirmed = if args.yes {
        true
    } else {
        cliclack::confirm("Generate native directories now (expo prebuild)?")
            .initial_value(true)
            .interact()?
    };
    if !confirmed {
        return Ok(false);
    }

    let status = run_step("prebuild", FailureMode::Warn, || async {
        exec::run_streamed(
            &CommandSpec::new("npx", &["expo", "prebuild"]),
            Some(project_dir.as_path()),
        )
        .await
    })
    .await?;

    let prebuilt = status.completed();

    // CocoaPods only applies to generated iOS projects on macOS
    if prebuilt && cfg!(target_os = "macos") && project_dir.join("ios").exists() {
        run_step("pod install", FailureMode::Warn, || async {
            exec::run_streamed(
                &CommandSpec::new("npx", &["pod-install"]),
                Some(project_dir.as_path()),
            )
            .await
        })
        .await?;
    }

    Ok(prebuilt)
}

fn print_next_steps<C: StarterConfig>(
    config: &C,
    project_dir: &PathBuf,
    prebuilt: bool,
) -> Result<()> {
    let steps = config.next_steps(project_dir, prebuilt);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    cliclack::outro("Happy shipping!")?;

    Ok(())
}
