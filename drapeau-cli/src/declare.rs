//! Declares a manifest on a fresh registry.

use anyhow::{anyhow, Context, Result};
use drapeau_core::{parse_integer, Drapeau, FlagType, ValueKind, NO_LONG};
use tracing::debug;

use crate::manifest::{FlagSpec, MainArgSpec, Manifest};

/// Build a registry holding every flag, subcommand and main argument of `manifest`.
pub fn build(manifest: &Manifest) -> Result<Drapeau> {
    let mut drapeau = Drapeau::with_config(
        &manifest.name,
        &manifest.description,
        manifest.config.clone(),
    );

    if let Some(main_arg) = &manifest.main_arg {
        declare_main_arg(&mut drapeau, main_arg, None)?;
    }
    for flag in &manifest.flags {
        declare_flag(&mut drapeau, flag, None)?;
    }

    for subcommand in &manifest.subcommands {
        let name = subcommand.name.as_str();
        drapeau
            .declare_subcommand(name, &subcommand.description)
            .with_context(|| format!("Failed to declare subcommand `{name}`"))?;

        if let Some(main_arg) = &subcommand.main_arg {
            declare_main_arg(&mut drapeau, main_arg, Some(name))?;
        }
        for flag in &subcommand.flags {
            declare_flag(&mut drapeau, flag, Some(name))?;
        }
    }

    debug!(
        flags = drapeau.global_scope().flags().len(),
        subcommands = drapeau.subcommands().len(),
        "manifest declared"
    );
    Ok(drapeau)
}

fn declare_main_arg(drapeau: &mut Drapeau, spec: &MainArgSpec, subcmd: Option<&str>) -> Result<()> {
    drapeau
        .declare_main_arg(&spec.name, &spec.description, subcmd)
        .with_context(|| format!("Failed to declare main argument `{}`", spec.name))?;
    Ok(())
}

fn declare_flag(drapeau: &mut Drapeau, spec: &FlagSpec, subcmd: Option<&str>) -> Result<()> {
    match spec.kind {
        ValueKind::Bool => declare_typed::<bool>(drapeau, spec, subcmd),
        ValueKind::I8 => declare_typed::<i8>(drapeau, spec, subcmd),
        ValueKind::I16 => declare_typed::<i16>(drapeau, spec, subcmd),
        ValueKind::I32 => declare_typed::<i32>(drapeau, spec, subcmd),
        ValueKind::I64 => declare_typed::<i64>(drapeau, spec, subcmd),
        ValueKind::U8 => declare_typed::<u8>(drapeau, spec, subcmd),
        ValueKind::U16 => declare_typed::<u16>(drapeau, spec, subcmd),
        ValueKind::U32 => declare_typed::<u32>(drapeau, spec, subcmd),
        ValueKind::U64 => declare_typed::<u64>(drapeau, spec, subcmd),
        ValueKind::String => declare_typed::<String>(drapeau, spec, subcmd),
    }
    .with_context(|| format!("Failed to declare flag {}", spec.label()))
}

fn declare_typed<T>(drapeau: &mut Drapeau, spec: &FlagSpec, subcmd: Option<&str>) -> Result<()>
where
    T: FlagType + Default + ManifestDefault,
{
    let long = spec.long.as_deref().unwrap_or(NO_LONG);

    if spec.list {
        drapeau.declare_list_flag::<T>(long, spec.short, &spec.description, subcmd)?;
    } else {
        let default = match &spec.default {
            Some(value) => T::from_toml(value)?,
            None => T::default(),
        };
        drapeau.declare_flag(long, spec.short, default, &spec.description, subcmd)?;
    }

    Ok(())
}

/// Conversion of a manifest `default` entry into a flag value.
trait ManifestDefault: Sized {
    fn from_toml(value: &toml::Value) -> Result<Self>;
}

impl ManifestDefault for bool {
    fn from_toml(value: &toml::Value) -> Result<Self> {
        value
            .as_bool()
            .ok_or_else(|| anyhow!("expected a boolean default, found {value}"))
    }
}

impl ManifestDefault for String {
    fn from_toml(value: &toml::Value) -> Result<Self> {
        value
            .as_str()
            .map(str::to_owned)
            .ok_or_else(|| anyhow!("expected a string default, found {value}"))
    }
}

// Integers accept a TOML integer or a string literal, so `"0xff"` and values
// above `i64::MAX` can be written.
macro_rules! integer_default {
    ($($ty:ty),*) => {$(
        impl ManifestDefault for $ty {
            fn from_toml(value: &toml::Value) -> Result<Self> {
                let parsed = match value {
                    toml::Value::Integer(number) => <$ty>::try_from(*number).ok(),
                    toml::Value::String(literal) => parse_integer::<$ty>(literal),
                    _ => None,
                };
                parsed.ok_or_else(|| {
                    anyhow!("default {value} does not fit in {}", <$ty as FlagType>::KIND)
                })
            }
        }
    )*};
}

integer_default!(i8, i16, i32, i64, u8, u16, u32, u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_declares_everything() {
        let manifest = Manifest::from_toml_str(
            r#"
name = "vesti"

[main_arg]
name = "FILES"

[[flags]]
long = "count"
kind = "u8"
default = "0x10"

[[subcommands]]
name = "build"
flags = [ { short = "r", kind = "bool" } ]
"#,
        )
        .unwrap();

        let drapeau = build(&manifest).unwrap();
        let global = drapeau.global_scope();
        assert_eq!(global.flags().len(), 2);
        assert_eq!(global.main_arg().name(), Some("FILES"));

        let build = &drapeau.subcommands()[0];
        assert_eq!(build.name(), "build");
        assert_eq!(build.scope().find_short('r'), Some(1));
    }

    #[test]
    fn test_integer_defaults() {
        assert_eq!(u8::from_toml(&toml::Value::Integer(255)).unwrap(), 255);
        assert!(u8::from_toml(&toml::Value::Integer(256)).is_err());
        assert_eq!(
            u64::from_toml(&toml::Value::String("18446744073709551615".into())).unwrap(),
            u64::MAX
        );
        assert_eq!(i16::from_toml(&toml::Value::String("-0x10".into())).unwrap(), -16);
        assert!(i32::from_toml(&toml::Value::Boolean(true)).is_err());
    }

    #[test]
    fn test_mismatched_default_fails_declaration() {
        let content = "[[flags]]\nlong = \"name\"\nkind = \"string\"\ndefault = 3\n";
        let manifest = Manifest::from_toml_str(content).unwrap();
        let err = build(&manifest).unwrap_err();
        assert!(err.to_string().contains("--name"));
    }

    #[test]
    fn test_duplicate_subcommand_fails() {
        let content = "[[subcommands]]\nname = \"a\"\n[[subcommands]]\nname = \"a\"\n";
        let manifest = Manifest::from_toml_str(content).unwrap();
        let err = build(&manifest).unwrap_err();
        assert!(err.to_string().contains("`a`"));
    }
}
