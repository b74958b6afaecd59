use regex::Regex;

pub type ValidationError = String;
pub type Validator = Box<dyn Fn(&str) -> Result<(), ValidationError> + Send + Sync>;

/// Run a list of validators against `value`, returning the first error.
pub fn run_validators(validators: &[Validator], value: &str) -> Result<(), ValidationError> {
    for validator in validators {
        validator(value)?;
    }
    Ok(())
}

/// All-or-nothing gate: true only when every validator accepts `value`.
pub fn is_valid(validators: &[Validator], value: &str) -> bool {
    run_validators(validators, value).is_ok()
}

pub fn required(message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &str| {
        if value.trim().is_empty() {
            Err(message.clone())
        } else {
            Ok(())
        }
    })
}

pub fn min_length(min_len: usize, message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &str| {
        if value.chars().count() < min_len {
            Err(message.clone())
        } else {
            Ok(())
        }
    })
}

pub fn max_length(max_len: usize, message: impl Into<String>) -> Validator {
    let message = message.into();
    Box::new(move |value: &str| {
        if value.chars().count() > max_len {
            Err(message.clone())
        } else {
            Ok(())
        }
    })
}

/// Accepts values matching `pattern`. The pattern is a compiled-in constant;
/// an invalid one is a programming error.
pub fn matches(pattern: &str, message: impl Into<String>) -> Validator {
    let re = Regex::new(pattern).expect("invalid validator pattern");
    let message = message.into();
    Box::new(move |value: &str| {
        if re.is_match(value) {
            Ok(())
        } else {
            Err(message.clone())
        }
    })
}

pub fn custom<F>(check: F, message: impl Into<String>) -> Validator
where
    F: Fn(&str) -> bool + Send + Sync + 'static,
{
    let message = message.into();
    Box::new(move |value: &str| if check(value) { Ok(()) } else { Err(message.clone()) })
}
