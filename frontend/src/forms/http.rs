use std::rc::Rc;

use gloo_net::http::Request;
use log::debug;
use wasm_bindgen_futures::spawn_local;

use super::submit::{Delivery, SubmitError, Submission, Submitter};
use super::FormKind;

/// Called once per submission with the backend's answer.
pub type Completion = Rc<dyn Fn(FormKind, Result<(), SubmitError>)>;

/// Posts each submission as JSON to `{base}/api/forms/{contact|poll}`.
pub struct HttpSubmitter {
    base_url: String,
    on_complete: Completion,
}

impl HttpSubmitter {
    pub fn new(base_url: impl Into<String>, on_complete: Completion) -> Self {
        Self {
            base_url: base_url.into(),
            on_complete,
        }
    }
}

impl Submitter for HttpSubmitter {
    fn submit(&mut self, submission: &Submission) -> Delivery {
        let url = format!("{}/api/forms/{}", self.base_url, submission.form.slug());
        let submission = submission.clone();
        let on_complete = Rc::clone(&self.on_complete);

        // The result is always reported from a later task, never from inside
        // the caller's dispatch.
        spawn_local(async move {
            let result = match Request::post(&url).json(&submission) {
                Ok(request) => match request.send().await {
                    Ok(response) if response.ok() => Ok(()),
                    Ok(response) => Err(SubmitError::Status(response.status())),
                    Err(e) => Err(SubmitError::Network(e.to_string())),
                },
                Err(e) => Err(SubmitError::Encode(e.to_string())),
            };
            debug!("{} delivery finished: {:?}", submission.form.slug(), result);
            on_complete(submission.form, result);
        });

        Delivery::Pending
    }
}
