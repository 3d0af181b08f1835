//! Fixed copy shown around the form and the snapshot.

use serde::Serialize;

pub const BEFORE_YOU_BEGIN: &str = "This diagnostic offers a snapshot of where you are right now. \
It's designed to prompt clarity and reflection — not to deliver a full solution. \
You'll see optional next steps at the end.";

pub const SNAPSHOT_DISCLAIMER: &str = "This snapshot highlights patterns, tensions, and signals \
based on your inputs. It's designed to support reflection and clarity — not to prescribe a full \
solution.";

pub const NEXT_STEPS: [&str; 3] = [
    "Sit with this snapshot and reflect on what resonates most.",
    "If you'd like guided support, you can explore early access to SHWIFT.",
    "Or simply return later as the ecosystem continues to evolve.",
];

pub const EARLY_VERSION_NOTE: &str = "This diagnostic is an early version of the SHWIFT engine. \
In future versions, this snapshot will seed a richer Digital Twin and generate tailored 30–90 day \
transformation paths for each tier (Community, Lab, and Pro).";

pub const EMPTY_SNAPSHOT_MESSAGE: &str =
    "The engine returned no content for this submission. You can submit the form again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CallToAction {
    pub label: &'static str,
    pub url: &'static str,
}

pub const CALL_TO_ACTION: CallToAction = CallToAction {
    label: "Join SHWIFT Early Access →",
    url: "https://shwift.uk#section02",
};
