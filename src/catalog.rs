//! # Content Catalog
//!
//! Fixed file payloads for the built-in dataset, keyed by `(name, version)`.
//! Names are `<repository>/<path>`; versions label the stage of the story a
//! payload belongs to (`initial`, `optional-vat`, `required-vat`, ...).
//!
//! The catalog holds data only. The plan builder in [`crate::plan`] looks
//! payloads up by key, so a custom catalog can be injected in tests.

use crate::error::{Error, Result};

/// One catalog payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentEntry {
    pub name: &'static str,
    pub version: &'static str,
    pub text: &'static str,
}

/// A lookup table of file payloads.
#[derive(Debug, Clone)]
pub struct ContentCatalog {
    entries: Vec<ContentEntry>,
}

impl ContentCatalog {
    /// Creates a catalog over the given entries. Later duplicates shadow
    /// earlier ones.
    pub fn new(entries: Vec<ContentEntry>) -> Self {
        Self { entries }
    }

    /// The payloads used by the built-in payments/VAT dataset.
    pub fn builtin() -> Self {
        Self::new(BUILTIN.to_vec())
    }

    /// Looks up a payload.
    pub fn get(&self, name: &str, version: &str) -> Result<&'static str> {
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.name == name && entry.version == version)
            .map(|entry| entry.text)
            .ok_or_else(|| Error::UnknownContent {
                name: name.to_string(),
                version: version.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

const fn entry(name: &'static str, version: &'static str, text: &'static str) -> ContentEntry {
    ContentEntry {
        name,
        version,
        text,
    }
}

static BUILTIN: &[ContentEntry] = &[
    // core-api
    entry(
        "core-api/README.md",
        "v1",
        "# Core API\n\nShared payments/auth helpers.\n",
    ),
    entry(
        "core-api/src/auth.py",
        "v1",
        "def authenticate(token: str) -> bool:\n    return token.startswith(\"tok_\")\n",
    ),
    entry(
        "core-api/src/payments.py",
        "initial",
        r#""""Core payments workflow."""


def create_payment(amount: float, currency: str) -> dict:
    """Create a payment using the initial contract (no VAT)."""
    if amount <= 0:
        raise ValueError("amount must be positive")
    return {
        "amount": amount,
        "currency": currency.upper(),
        "status": "pending",
        "requires_vat_code": False,
    }
"#,
    ),
    entry(
        "core-api/src/payments.py",
        "optional-vat",
        r#""""Core payments workflow."""


def create_payment(amount: float, currency: str, vat_code: str | None = None) -> dict:
    """Allow downstream callers to include a VAT code (optional)."""
    if amount <= 0:
        raise ValueError("amount must be positive")
    payload = {
        "amount": amount,
        "currency": currency.upper(),
        "status": "pending",
        "requires_vat_code": False,
    }
    if vat_code:
        payload["vat_code"] = vat_code
    return payload
"#,
    ),
    entry(
        "core-api/src/payments.py",
        "required-vat",
        r#""""Core payments workflow with VAT enforcement for EU regions."""


EU_CURRENCIES = {"EUR", "SEK", "DKK", "NOK"}


def create_payment(
    amount: float,
    currency: str,
    *,
    region: str = "US",
    vat_code: str | None = None,
) -> dict:
    """Require vat_code for EU customers to satisfy compliance."""
    if amount <= 0:
        raise ValueError("amount must be positive")

    upper_region = region.upper()
    currency = currency.upper()

    if upper_region == "EU" or currency in EU_CURRENCIES:
        if not vat_code:
            raise ValueError("vat_code is required for EU payments")

    payload = {
        "amount": amount,
        "currency": currency,
        "region": upper_region,
        "status": "pending",
        "requires_vat_code": upper_region == "EU" or currency in EU_CURRENCIES,
    }
    if vat_code:
        payload["vat_code"] = vat_code
    return payload
"#,
    ),
    entry(
        "core-api/openapi/payments.yaml",
        "initial",
        r#"openapi: 3.0.0
info:
  title: Core Payments API
  version: "1.0.0"
paths:
  /v1/payments/create:
    post:
      summary: Create a payment
      requestBody:
        required: true
        content:
          application/json:
            schema:
              type: object
              required: [amount, currency]
              properties:
                amount:
                  type: number
                currency:
                  type: string
      responses:
        "200":
          description: Payment created
"#,
    ),
    entry(
        "core-api/openapi/payments.yaml",
        "optional-vat",
        r#"openapi: 3.0.0
info:
  title: Core Payments API
  version: "1.1.0"
paths:
  /v1/payments/create:
    post:
      summary: Create a payment (VAT optional)
      requestBody:
        required: true
        content:
          application/json:
            schema:
              type: object
              required: [amount, currency]
              properties:
                amount:
                  type: number
                currency:
                  type: string
                vat_code:
                  type: string
                  description: Optional VAT code for EU merchants
      responses:
        "200":
          description: Payment created
"#,
    ),
    entry(
        "core-api/openapi/payments.yaml",
        "required-vat",
        r#"openapi: 3.0.0
info:
  title: Core Payments API
  version: "2.0.0"
paths:
  /v1/payments/create:
    post:
      summary: Create a payment (VAT required for EU)
      requestBody:
        required: true
        content:
          application/json:
            schema:
              type: object
              required: [amount, currency, region]
              properties:
                amount:
                  type: number
                currency:
                  type: string
                region:
                  type: string
                  enum: [US, EU, ROW]
                vat_code:
                  type: string
                  description: Required when region is EU
      responses:
        "200":
          description: Payment created
"#,
    ),
    entry(
        "core-api/docs/payments.md",
        "v1",
        r#"# Payments API

The `/v1/payments/create` endpoint submits a new payment using the shared
library. Initial integration only requires `amount` and `currency`.

Downstream teams embed this module directly or call over HTTP.
"#,
    ),
    // billing-service
    entry(
        "billing-service/README.md",
        "v1",
        "# Billing Service\n\nHandles checkout orchestration.\n",
    ),
    entry(
        "billing-service/src/core_api_client.py",
        "initial",
        r#"import json
import urllib.request


CORE_API_URL = "https://core-api.internal/v1/payments/create"


def create_payment(*, amount: float, currency: str) -> dict:
    request = urllib.request.Request(
        CORE_API_URL,
        method="POST",
        data=json.dumps({"amount": amount, "currency": currency}).encode("utf-8"),
        headers={"Content-Type": "application/json"},
    )
    with urllib.request.urlopen(request, timeout=5) as handle:
        return json.loads(handle.read())
"#,
    ),
    entry(
        "billing-service/src/core_api_client.py",
        "with-vat",
        r#"import json
import urllib.request


CORE_API_URL = "https://core-api.internal/v1/payments/create"


def create_payment(*, amount: float, currency: str, region: str, vat_code: str | None) -> dict:
    body = {"amount": amount, "currency": currency, "region": region}
    if region.upper() == "EU":
        body["vat_code"] = vat_code

    request = urllib.request.Request(
        CORE_API_URL,
        method="POST",
        data=json.dumps(body).encode("utf-8"),
        headers={"Content-Type": "application/json"},
    )
    with urllib.request.urlopen(request, timeout=5) as handle:
        return json.loads(handle.read())
"#,
    ),
    entry(
        "billing-service/src/checkout.py",
        "initial",
        r#"from .core_api_client import create_payment


def checkout(cart):
    payload = create_payment(amount=cart.total, currency=cart.currency)
    if payload["status"] != "pending":
        raise RuntimeError("Unexpected payment state")
    return {"status": "ok", "payment": payload}
"#,
    ),
    entry(
        "billing-service/src/checkout.py",
        "expanded",
        r#"from .core_api_client import create_payment


def checkout(cart):
    payload = create_payment(amount=cart.total_with_discounts(), currency=cart.currency)
    if payload["status"] != "pending":
        raise RuntimeError("Unexpected payment state")

    if cart.requires_invoice():
        payload["invoice_id"] = cart.invoice_id

    return {"status": "ok", "payment": payload}
"#,
    ),
    entry(
        "billing-service/src/checkout.py",
        "partial-fix",
        r#"from .core_api_client import create_payment


def checkout(cart):
    region = "EU" if cart.currency in {"EUR", "SEK"} else "US"
    vat_code = cart.tax_profile.vat_code if region == "EU" else None

    payload = create_payment(
        amount=cart.total_with_discounts(),
        currency=cart.currency,
        region=region,
        vat_code=vat_code,
    )

    if cart.requires_invoice():
        payload["invoice_id"] = cart.invoice_id

    return {"status": "ok", "payment": payload}
"#,
    ),
    entry(
        "billing-service/config/core_api.yml",
        "v1",
        "core_api:\n  url: https://core-api.internal/v1/payments/create\n  timeout_seconds: 5\n",
    ),
    entry(
        "billing-service/docs/billing_onboarding.md",
        "v1",
        r#"# Billing Onboarding

1. Collect the cart total.
2. Call `/v1/payments/create` with `amount` and `currency`.
3. Record the `payment_id` for future reconciliation.

VAT codes are *not* required for the current contract.
"#,
    ),
    entry(
        "billing-service/docs/api_usage.md",
        "initial",
        r#"# API Usage

Billing depends on the shared core-api. Requests currently mirror the OpenAPI spec.

"#,
    ),
    entry(
        "billing-service/docs/api_usage.md",
        "updated",
        concat!(
            "        # API Usage\n",
            "\n",
            "        Billing depends on the shared core-api. ",
            "Requests currently mirror the OpenAPI spec.\n",
            "\n",
            "- EU carts must attach a VAT code after the core-api 2.0 breaking change.\n",
        ),
    ),
    // notifications-service
    entry(
        "notifications-service/README.md",
        "v1",
        "# Notifications Service\n\nSends receipts post-payment.\n",
    ),
    entry(
        "notifications-service/src/notifications.py",
        "v1",
        r#"import json
import urllib.request


CORE_API_URL = "https://core-api.internal/v1/notifications/send"


def send_notification(user_id: str, template: str) -> dict:
    body = {"user_id": user_id, "template": template}
    request = urllib.request.Request(
        CORE_API_URL,
        method="POST",
        data=json.dumps(body).encode("utf-8"),
        headers={"Content-Type": "application/json"},
    )
    with urllib.request.urlopen(request, timeout=5) as handle:
        return json.loads(handle.read())
"#,
    ),
    entry(
        "notifications-service/src/scheduler.py",
        "interval-60",
        r#"import time

DEFAULT_INTERVAL_SECONDS = 60


def run_scheduler(dispatch_fn):
    while True:
        dispatch_fn()
        time.sleep(DEFAULT_INTERVAL_SECONDS)
"#,
    ),
    entry(
        "notifications-service/src/scheduler.py",
        "interval-120",
        r#"import time

DEFAULT_INTERVAL_SECONDS = 120


def run_scheduler(dispatch_fn):
    while True:
        dispatch_fn()
        time.sleep(DEFAULT_INTERVAL_SECONDS)
"#,
    ),
    entry(
        "notifications-service/docs/notification_playbook.md",
        "v1",
        r#"# Notification Playbook

The service calls `/v1/notifications/send` to deliver receipts after billing events.
"#,
    ),
    // docs-portal
    entry(
        "docs-portal/docs/payments_api.md",
        "initial",
        r#"# Payments API (Docs Portal)

- Endpoint: `POST /v1/payments/create`
- Required fields: `amount`, `currency`
- Notes: VAT is not part of the request yet.
"#,
    ),
    entry(
        "docs-portal/docs/payments_api.md",
        "vat-note",
        r#"# Payments API (Docs Portal)

- Endpoint: `POST /v1/payments/create`
- Required fields: `amount`, `currency`
- Notes: VAT is required for EU customers but the billing flow doc still needs an update.
"#,
    ),
    entry(
        "docs-portal/docs/billing_flows.md",
        "initial",
        r#"# Billing Flows

The billing team still references older payloads containing amount and currency.
"#,
    ),
    entry(
        "docs-portal/docs/changelog.md",
        "initial",
        "# Changelog\n\n- Initial payments docs published.\n",
    ),
    entry(
        "docs-portal/docs/changelog.md",
        "vat-note",
        "# Changelog\n\n- Initial payments docs published.\n- Added VAT note (billing flow pending update).\n",
    ),
];
