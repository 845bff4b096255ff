//! Create/edit form rendered from a resource's field schema.

use dioxus::prelude::*;
use tracing::warn;

use super::Modal;
use crate::resource::{FieldKind, FieldSpec, FieldValue};
use crate::upload::ImageAsset;

/// One schema field with its current draft value.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry {
    pub spec: FieldSpec,
    pub value: FieldValue,
    /// Absolute URL of the current image, for image fields that have one
    pub preview: Option<String>,
}

#[component]
pub fn ResourceForm(
    title: String,
    fields: Vec<FieldEntry>,
    error: Option<String>,
    upload_notice: Option<String>,
    submitting: bool,
    on_change: EventHandler<(&'static str, FieldValue)>,
    on_upload: EventHandler<ImageAsset>,
    on_submit: EventHandler<()>,
    on_close: EventHandler<()>,
) -> Element {
    rsx! {
        Modal { title, on_close,
            form {
                onsubmit: move |e| {
                    e.prevent_default();
                    on_submit.call(());
                },

                for entry in fields {
                    FieldInput {
                        key: "{entry.spec.name}",
                        entry: entry.clone(),
                        disabled: submitting,
                        on_change,
                        on_upload,
                    }
                }

                if let Some(ref notice) = upload_notice {
                    p { class: "status-err", "{notice}" }
                }
                if let Some(ref err) = error {
                    p { class: "status-err", "{err}" }
                }

                div { class: "row-actions", style: "justify-content:flex-end;",
                    button {
                        r#type: "button",
                        class: "secondary outline",
                        onclick: move |_| on_close.call(()),
                        "Cancel"
                    }
                    button {
                        r#type: "submit",
                        disabled: submitting,
                        aria_busy: if submitting { "true" } else { "false" },
                        if submitting { "Saving..." } else { "Save" }
                    }
                }
            }
        }
    }
}

#[component]
fn FieldInput(
    entry: FieldEntry,
    disabled: bool,
    on_change: EventHandler<(&'static str, FieldValue)>,
    on_upload: EventHandler<ImageAsset>,
) -> Element {
    let name = entry.spec.name;
    let label = if entry.spec.required {
        format!("{} *", entry.spec.label)
    } else {
        entry.spec.label.to_string()
    };
    let text = entry.value.as_text().to_string();

    let control = match entry.spec.kind {
        FieldKind::Flag => {
            let checked = entry.value.as_flag();
            return rsx! {
                label {
                    input {
                        r#type: "checkbox",
                        role: "switch",
                        checked,
                        disabled,
                        onchange: move |_| on_change.call((name, FieldValue::Flag(!checked))),
                    }
                    "{entry.spec.label}"
                }
            };
        }
        FieldKind::LongText => rsx! {
            textarea {
                id: "{name}",
                rows: "4",
                value: "{text}",
                disabled,
                oninput: move |e| on_change.call((name, FieldValue::Text(e.value()))),
            }
        },
        FieldKind::Choice(choices) => {
            // a stored value another client wrote stays selectable
            let stored = (!text.is_empty() && !choices.iter().any(|(v, _)| *v == text))
                .then(|| text.clone());
            rsx! {
                select {
                    id: "{name}",
                    value: "{text}",
                    disabled,
                    onchange: move |e| on_change.call((name, FieldValue::Text(e.value()))),
                    option { value: "", disabled: true, selected: text.is_empty(), "Select {entry.spec.label}" }
                    if let Some(ref raw) = stored {
                        option { value: "{raw}", selected: true, "{raw}" }
                    }
                    for (value, caption) in choices.iter() {
                        option { value: "{value}", selected: text == *value, "{caption}" }
                    }
                }
            }
        }
        FieldKind::Image => rsx! {
            if let Some(ref src) = entry.preview {
                img { class: "image-preview", src: "{src}", alt: "{entry.spec.label}" }
            }
            input {
                id: "{name}",
                r#type: "file",
                accept: "image/*",
                disabled,
                onchange: move |evt: FormEvent| async move {
                    let Some(file) = evt.files().into_iter().next() else {
                        return;
                    };
                    let file_name = file.name();
                    let content_type = file.content_type().unwrap_or_default();
                    match file.read_bytes().await {
                        Ok(bytes) => on_upload.call(ImageAsset::new(file_name, content_type, bytes.to_vec())),
                        Err(e) => warn!("Could not read {}: {}", file_name, e),
                    }
                },
            }
            if !text.is_empty() {
                small { "{text}" }
            }
        },
        kind => {
            let input_type = match kind {
                FieldKind::Date => "date",
                FieldKind::Time => "time",
                FieldKind::Url => "url",
                FieldKind::Email => "email",
                _ => "text",
            };
            rsx! {
                input {
                    id: "{name}",
                    r#type: input_type,
                    value: "{text}",
                    disabled,
                    oninput: move |e| on_change.call((name, FieldValue::Text(e.value()))),
                }
            }
        }
    };

    rsx! {
        label { r#for: "{name}", "{label}" }
        {control}
    }
}
