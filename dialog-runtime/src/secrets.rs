use anyhow::Context;

/// Where we store endpoint passwords in the OS keyring.
///
/// This is intentionally constant so upgrades don't orphan secrets.
const SERVICE: &str = "dialogkit";

fn user(service_id: &str) -> String {
    format!("{}_password", service_id.to_ascii_lowercase())
}

pub fn set_password(service_id: &str, value: &str) -> anyhow::Result<()> {
    let entry = keyring::Entry::new(SERVICE, &user(service_id)).context("create keyring entry")?;
    entry.set_password(value).context("set secret")
}

pub fn get_password(service_id: &str) -> anyhow::Result<Option<String>> {
    let entry = keyring::Entry::new(SERVICE, &user(service_id)).context("create keyring entry")?;

    match entry.get_password() {
        Ok(v) => Ok(Some(v)),
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(anyhow::Error::new(e)).context("get secret"),
    }
}

pub fn delete_password(service_id: &str) -> anyhow::Result<()> {
    let entry = keyring::Entry::new(SERVICE, &user(service_id)).context("create keyring entry")?;
    match entry.delete_credential() {
        Ok(()) => Ok(()),
        Err(keyring::Error::NoEntry) => Ok(()),
        Err(e) => Err(anyhow::Error::new(e)).context("delete secret"),
    }
}
