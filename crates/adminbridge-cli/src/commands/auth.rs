use adminbridge_core::{AdminBridge, AuthState, Credentials, UserProfile};
use anyhow::{Context, Result, bail};
use colored::Colorize;
use serde::Serialize;

use crate::cli::LoginArgs;
use crate::output::{OutputFormat, json::print_json, table::print_fields};

#[derive(Serialize)]
struct StatusReport {
    state: AuthState,
    base_url: String,
    has_refresh_token: bool,
    profile_cached: bool,
    dictionary_cached: bool,
    routes: usize,
}

pub async fn login(bridge: &AdminBridge, args: LoginArgs, format: OutputFormat) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ").context("Failed to read password")?,
    };
    if password.is_empty() {
        bail!("Password must not be empty");
    }

    let mut credentials = Credentials::new(args.username, password);
    if let (Some(captcha), Some(key)) = (args.captcha, args.captcha_key) {
        credentials = credentials.with_captcha(captcha, key);
    }

    let profile = bridge.auth.login(&credentials).await?;

    if format.is_json() {
        return print_json(&profile);
    }

    println!(
        "{} Signed in as {} ({} routes)",
        "✓".green().bold(),
        display_name(&profile).bold(),
        bridge.routes.flatten().len()
    );
    Ok(())
}

pub async fn logout(bridge: &AdminBridge) -> Result<()> {
    if !bridge.state().is_authenticated() {
        println!("Not signed in.");
        return Ok(());
    }

    bridge.auth.logout().await?;
    println!("{} Signed out", "✓".green().bold());
    Ok(())
}

pub async fn refresh(bridge: &AdminBridge) -> Result<()> {
    bridge.auth.refresh().await?;
    println!("{} Access token refreshed", "✓".green().bold());
    Ok(())
}

pub fn status(bridge: &AdminBridge, format: OutputFormat) -> Result<()> {
    let report = StatusReport {
        state: bridge.state(),
        base_url: bridge.config.base_url.clone(),
        has_refresh_token: bridge.session.refresh_token()?.is_some(),
        profile_cached: bridge.profile.get()?.is_some(),
        dictionary_cached: bridge.lookup.get()?.is_some(),
        routes: bridge.routes.flatten().len(),
    };

    if format.is_json() {
        return print_json(&report);
    }

    let state = if report.state.is_authenticated() {
        "authenticated".green().to_string()
    } else {
        "anonymous".yellow().to_string()
    };

    print_fields(&[
        ("State", state),
        ("Base URL", report.base_url),
        ("Refresh token", yes_no(report.has_refresh_token)),
        ("Profile cached", yes_no(report.profile_cached)),
        ("Dictionary cached", yes_no(report.dictionary_cached)),
        ("Routes loaded", report.routes.to_string()),
    ])
}

pub async fn whoami(bridge: &AdminBridge, format: OutputFormat) -> Result<()> {
    if !bridge.state().is_authenticated() {
        bail!("Not signed in");
    }

    let profile = bridge.profile.ensure().await?;

    if format.is_json() {
        return print_json(&profile);
    }

    print_fields(&[
        ("ID", profile.id.clone().unwrap_or_default()),
        ("Username", profile.username.clone()),
        ("Nickname", profile.nickname.clone()),
        ("Roles", profile.roles.join(", ")),
        ("Permissions", profile.auth_btn_list.len().to_string()),
        ("Avatar", profile.avatar.clone()),
        ("Last login", profile.last_login_time.clone()),
    ])
}

fn display_name(profile: &UserProfile) -> String {
    if profile.nickname.is_empty() {
        profile.username.clone()
    } else {
        profile.nickname.clone()
    }
}

fn yes_no(flag: bool) -> String {
    let text = if flag { "yes" } else { "no" };
    text.to_string()
}
