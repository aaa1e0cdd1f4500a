use mongodb::{
    bson::{doc, Document},
    options::FindOptions,
};
use rocket::{
    futures::TryStreamExt,
    http::Status,
    serde::json::{json, Json, Value},
    Route,
};
use serde::Serialize;

use crate::{
    error::{Error, Result},
    model::{
        api::{
            auth::AuthToken,
            export::{export_filename, responses_csv, CsvAttachment},
            form::{FormDescription, FormSpec},
            pagination::{PaginationRequest, PaginationResult},
            response::{ResponseDescription, ResponseSpec},
            summary::{summarize, QuestionSummary},
        },
        db::{
            form::{Form, NewForm},
            response::{FormResponse, NewFormResponse},
        },
        mongodb::{Coll, Id},
    },
};

pub fn routes() -> Vec<Route> {
    routes![
        create_form,
        list_forms,
        public_form,
        submit_response,
        list_responses,
        form_summary,
        export_responses,
    ]
}

/// Create a new form owned by the authenticated admin.
#[post("/", data = "<spec>", format = "json")]
async fn create_form(
    token: AuthToken,
    spec: Json<FormSpec>,
    new_forms: Coll<NewForm>,
    forms: Coll<Form>,
) -> Result<(Status, Json<FormDescription>)> {
    let spec = spec.into_inner();
    spec.validate()?;

    let form = spec.into_form(*token.id);
    let new_id: Id = new_forms
        .insert_one(&form, None)
        .await?
        .inserted_id
        .as_object_id()
        .unwrap() // Valid because the ID comes directly from the DB.
        .into();

    // Read the form back so the response reflects exactly what was stored.
    let form = forms
        .find_one(new_id.as_doc(), None)
        .await?
        .unwrap(); // Valid because we just inserted it and forms are never deleted.
    Ok((Status::Created, Json(form.into())))
}

#[derive(Debug, Serialize)]
struct FormsPage {
    forms: Vec<FormDescription>,
    #[serde(flatten)]
    pagination: PaginationResult,
}

/// List the authenticated admin's own forms, oldest first.
#[get("/")]
async fn list_forms(
    token: AuthToken,
    pagination: PaginationRequest,
    forms: Coll<Form>,
) -> Result<Json<FormsPage>> {
    let filter = doc! {
        "owner": *token.id,
    };
    let options = FindOptions::builder()
        .sort(doc! {"_id": 1})
        .skip(pagination.skip())
        .limit(pagination.limit() as i64)
        .build();

    let page: Vec<Form> = forms
        .find(filter.clone(), options)
        .await?
        .try_collect()
        .await?;
    let total = forms.count_documents(filter, None).await?;

    Ok(Json(FormsPage {
        forms: page.into_iter().map(FormDescription::from).collect(),
        pagination: pagination.result(total),
    }))
}

/// Fetch a form by its public link. No authentication, and the owner is
/// never part of the description.
#[get("/public/<form_id>")]
async fn public_form(form_id: Id, forms: Coll<Form>) -> Result<Json<FormDescription>> {
    let form = forms
        .find_one(form_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Form {form_id}")))?;
    Ok(Json(form.into()))
}

/// Submit a response to a form. Public; answers are validated against the
/// form's schema and stored verbatim.
#[post("/public/<form_id>/response", data = "<submission>", format = "json")]
async fn submit_response(
    form_id: Id,
    submission: Json<ResponseSpec>,
    forms: Coll<Form>,
    responses: Coll<NewFormResponse>,
) -> Result<(Status, Json<Value>)> {
    let form = forms
        .find_one(form_id.as_doc(), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Form {form_id}")))?;

    let submission = submission.into_inner();
    submission.validate_against(&form)?;

    responses
        .insert_one(submission.into_response(form.id), None)
        .await?;
    Ok((
        Status::Created,
        Json(json!({"message": "Response submitted"})),
    ))
}

#[derive(Debug, Serialize)]
struct ResponsesPage {
    responses: Vec<ResponseDescription>,
    #[serde(flatten)]
    pagination: PaginationResult,
}

/// List a form's responses, oldest first. Owner only.
#[get("/<form_id>/responses")]
async fn list_responses(
    token: AuthToken,
    form_id: Id,
    pagination: PaginationRequest,
    forms: Coll<Form>,
    responses: Coll<FormResponse>,
) -> Result<Json<ResponsesPage>> {
    let form = owned_form(form_id, &token, &forms).await?;

    let filter = doc! {
        "form": form.id,
    };
    let options = FindOptions::builder()
        .sort(doc! {"_id": 1})
        .skip(pagination.skip())
        .limit(pagination.limit() as i64)
        .build();

    let page: Vec<FormResponse> = responses
        .find(filter.clone(), options)
        .await?
        .try_collect()
        .await?;
    let total = responses.count_documents(filter, None).await?;

    Ok(Json(ResponsesPage {
        responses: page.into_iter().map(ResponseDescription::from).collect(),
        pagination: pagination.result(total),
    }))
}

#[derive(Debug, Serialize)]
struct SummaryResponse {
    summary: Vec<QuestionSummary>,
}

/// Tabulated per-question summary over all of a form's responses. Owner
/// only. Recomputed in full on every request.
#[get("/<form_id>/summary")]
async fn form_summary(
    token: AuthToken,
    form_id: Id,
    forms: Coll<Form>,
    responses: Coll<FormResponse>,
) -> Result<Json<SummaryResponse>> {
    let form = owned_form(form_id, &token, &forms).await?;
    let all_responses = all_responses(&form, &responses).await?;
    Ok(Json(SummaryResponse {
        summary: summarize(&form, &all_responses),
    }))
}

/// Download all of a form's responses as a CSV attachment. Owner only.
#[get("/<form_id>/export")]
async fn export_responses(
    token: AuthToken,
    form_id: Id,
    forms: Coll<Form>,
    responses: Coll<FormResponse>,
) -> Result<CsvAttachment> {
    let form = owned_form(form_id, &token, &forms).await?;
    let all_responses = all_responses(&form, &responses).await?;
    let csv = responses_csv(&form, &all_responses)?;
    Ok(CsvAttachment::new(export_filename(&form.title), csv))
}

/// Filter selecting a form only if it has the given owner.
fn owned_by(form_id: Id, owner: Id) -> Document {
    doc! {
        "_id": form_id,
        "owner": owner,
    }
}

/// Look up a form that must belong to the authenticated admin.
///
/// A form owned by someone else is reported exactly like a missing one, so
/// the response does not leak whether the ID exists.
async fn owned_form(form_id: Id, token: &AuthToken, forms: &Coll<Form>) -> Result<Form> {
    forms
        .find_one(owned_by(form_id, *token.id), None)
        .await?
        .ok_or_else(|| Error::not_found(format!("Form {form_id}")))
}

/// Fetch every response to the given form, in submission order.
async fn all_responses(form: &Form, responses: &Coll<FormResponse>) -> Result<Vec<FormResponse>> {
    let filter = doc! {
        "form": form.id,
    };
    let options = FindOptions::builder().sort(doc! {"_id": 1}).build();
    Ok(responses.find(filter, options).await?.try_collect().await?)
}

#[cfg(test)]
mod tests {
    use rocket::{
        http::{ContentType, Header, Status},
        local::asynchronous::Client,
        serde::json::{self, Value},
    };

    use super::*;
    use crate::model::api::{admin::AdminCredentials, auth::AUTHORIZATION_HEADER};

    #[test]
    fn owner_filter_excludes_foreign_forms() {
        let form = Form::example();
        let stored = mongodb::bson::to_document(&form).unwrap();
        let matches =
            |filter: Document| filter.iter().all(|(key, value)| stored.get(key) == Some(value));

        assert!(matches(owned_by(form.id, form.owner)));
        assert!(!matches(owned_by(form.id, Id::new())));
        assert!(!matches(owned_by(Id::new(), form.owner)));
    }

    // The tests below drive the full routes and need a reachable MongoDB;
    // each one gets a fresh randomly-named database.

    async fn client() -> Client {
        Client::tracked(crate::build())
            .await
            .expect("failed to build test server")
    }

    /// Register and log in, returning the bearer header for the account.
    async fn authenticate(client: &Client, credentials: &AdminCredentials) -> Header<'static> {
        let body = json::to_string(credentials).unwrap();

        let response = client
            .post("/api/auth/register")
            .header(ContentType::JSON)
            .body(&body)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Created);

        let response = client
            .post("/api/auth/login")
            .header(ContentType::JSON)
            .body(&body)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        let token = body["token"].as_str().unwrap();
        Header::new(AUTHORIZATION_HEADER, format!("Bearer {token}"))
    }

    async fn create_example_form(client: &Client, auth: &Header<'static>) -> String {
        let body = json::to_string(&crate::model::api::form::FormSpec::example()).unwrap();
        let response = client
            .post("/api/forms")
            .header(ContentType::JSON)
            .header(auth.clone())
            .body(body)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Created);
        let body: Value = response.into_json().await.unwrap();
        body["id"].as_str().unwrap().to_string()
    }

    #[rocket::async_test]
    #[ignore = "requires a running MongoDB"]
    async fn foreign_form_reported_as_missing() {
        let client = client().await;
        let alice = authenticate(&client, &AdminCredentials::example()).await;
        let bob = authenticate(&client, &AdminCredentials::example2()).await;
        let form_id = create_example_form(&client, &alice).await;
        let uri = format!("/api/forms/{form_id}/summary");

        let response = client.get(uri.as_str()).header(bob).dispatch().await;
        assert_eq!(response.status(), Status::NotFound);

        let response = client.get(uri.as_str()).header(alice).dispatch().await;
        assert_eq!(response.status(), Status::Ok);
    }

    #[rocket::async_test]
    #[ignore = "requires a running MongoDB"]
    async fn pagination_over_stored_forms() {
        let client = client().await;
        let alice = authenticate(&client, &AdminCredentials::example()).await;
        for _ in 0..15 {
            create_example_form(&client, &alice).await;
        }

        let response = client
            .get("/api/forms?page=2&limit=10")
            .header(alice)
            .dispatch()
            .await;
        assert_eq!(response.status(), Status::Ok);
        let body: Value = response.into_json().await.unwrap();
        assert_eq!(body["forms"].as_array().unwrap().len(), 5);
        assert_eq!(body["total"], 15);
        assert_eq!(body["pages"], 2);
    }
}
