use std::str::FromStr;

use jdescriptor::{MethodDescriptor, TypeDescriptor};

use crate::names::to_dot_form;

/// Java source spelling of a field descriptor (`[Ljava/lang/String;` ->
/// `java.lang.String[]`). Returns `None` if the descriptor is malformed.
pub fn field_type_name(descriptor: &str) -> Option<String> {
    let parsed = TypeDescriptor::from_str(descriptor).ok()?;
    (is_value_type(&parsed) && type_descriptor(&parsed) == descriptor)
        .then(|| type_name(&parsed))
}

/// Parameter and return types of a method descriptor.
pub fn method_type_names(descriptor: &str) -> Option<(Vec<String>, String)> {
    let parsed = MethodDescriptor::from_str(descriptor).ok()?;
    let parameters = parsed.parameter_types();
    let return_type = parsed.return_type();
    if !parameters.iter().all(is_value_type) || !is_return_type(return_type) {
        return None;
    }
    let canonical: String = parameters.iter().map(type_descriptor).collect();
    if format!("({canonical}){}", type_descriptor(return_type)) != descriptor {
        return None;
    }
    Some((
        parameters.iter().map(type_name).collect(),
        type_name(return_type),
    ))
}

/// Anything but `void`, which only appears as a bare return type.
fn is_value_type(descriptor: &TypeDescriptor) -> bool {
    match descriptor {
        TypeDescriptor::Void => false,
        TypeDescriptor::Object(class_name) => !class_name.is_empty(),
        TypeDescriptor::Array(element, _) => is_value_type(element),
        _ => true,
    }
}

fn is_return_type(descriptor: &TypeDescriptor) -> bool {
    matches!(descriptor, TypeDescriptor::Void) || is_value_type(descriptor)
}

fn type_name(descriptor: &TypeDescriptor) -> String {
    match descriptor {
        TypeDescriptor::Byte => "byte".to_string(),
        TypeDescriptor::Char => "char".to_string(),
        TypeDescriptor::Double => "double".to_string(),
        TypeDescriptor::Float => "float".to_string(),
        TypeDescriptor::Integer => "int".to_string(),
        TypeDescriptor::Long => "long".to_string(),
        TypeDescriptor::Short => "short".to_string(),
        TypeDescriptor::Boolean => "boolean".to_string(),
        TypeDescriptor::Void => "void".to_string(),
        TypeDescriptor::Object(class_name) => to_dot_form(class_name),
        TypeDescriptor::Array(element, dimensions) => {
            format!("{}{}", type_name(element), "[]".repeat(*dimensions as usize))
        }
    }
}

/// Canonical descriptor text of a parsed type, used to reject input the
/// parser only partly consumed.
fn type_descriptor(descriptor: &TypeDescriptor) -> String {
    match descriptor {
        TypeDescriptor::Byte => "B".to_string(),
        TypeDescriptor::Char => "C".to_string(),
        TypeDescriptor::Double => "D".to_string(),
        TypeDescriptor::Float => "F".to_string(),
        TypeDescriptor::Integer => "I".to_string(),
        TypeDescriptor::Long => "J".to_string(),
        TypeDescriptor::Short => "S".to_string(),
        TypeDescriptor::Boolean => "Z".to_string(),
        TypeDescriptor::Void => "V".to_string(),
        TypeDescriptor::Object(class_name) => format!("L{class_name};"),
        TypeDescriptor::Array(element, dimensions) => {
            format!("{}{}", "[".repeat(*dimensions as usize), type_descriptor(element))
        }
    }
}
