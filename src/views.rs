//! Server-rendered pages. All customer data is escaped before it is written
//! into markup.

use crate::models::customer::Customer;
use crate::utils::DATE_FORMAT;

const SORTABLE: [(&str, &str); 6] = [
    ("FirstName", "First name"),
    ("LastName", "Last name"),
    ("BirthDate", "Birth date"),
    ("Gender", "Gender"),
    ("Email", "Email"),
    ("Address", "Address"),
];

// Posts the form as JSON and reports the server's error message.
const SUBMIT_SCRIPT: &str = r#"
<script>
document.querySelector("form").addEventListener("submit", async (event) => {
  event.preventDefault();
  const form = event.target;
  const body = Object.fromEntries(new FormData(form).entries());
  const response = await fetch(form.action, {
    method: "POST",
    headers: { "Content-Type": "application/json" },
    body: JSON.stringify(body),
  });
  if (response.ok) {
    window.location = "/";
    return;
  }
  const result = await response.json().catch(() => ({}));
  document.getElementById("error").textContent = result.error || result.message || response.statusText;
});
</script>
"#;

pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }

    escaped
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

fn sort_link(column: &str, label: &str, current: Option<&str>, descending: bool) -> String {
    // clicking the active column flips its direction
    let desc = current == Some(column) && !descending;

    format!(
        "<a href=\"/?sort={}&amp;desc={}\">{}</a>",
        column, desc, label
    )
}

pub fn customer_list(
    customers: &[Customer],
    search: Option<&str>,
    sort: Option<&str>,
    descending: bool,
) -> String {
    let mut body = String::from("<h1>Customers</h1>\n");

    body.push_str(&format!(
        "<form method=\"get\" action=\"/\"><input type=\"text\" name=\"search\" value=\"{}\"> <button type=\"submit\">Search</button></form>\n",
        escape(search.unwrap_or_default())
    ));
    body.push_str("<p><a href=\"/create\">New customer</a></p>\n");

    body.push_str("<table>\n<tr>");
    for (column, label) in SORTABLE {
        body.push_str(&format!("<th>{}</th>", sort_link(column, label, sort, descending)));
    }
    body.push_str("<th></th></tr>\n");

    for customer in customers {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td><a href=\"/edit/{}\">Edit</a></td></tr>\n",
            escape(&customer.first_name),
            escape(&customer.last_name),
            customer.birth_date.format(DATE_FORMAT),
            customer.gender,
            escape(&customer.email),
            escape(&customer.address),
            customer.id
        ));
    }
    body.push_str("</table>\n");

    if customers.is_empty() {
        body.push_str("<p>No customers found.</p>\n");
    }

    page("Customers", &body)
}

fn customer_form(action: &str, heading: &str, customer: Option<&Customer>) -> String {
    let value = |field: fn(&Customer) -> String| -> String {
        customer.map(|c| escape(&field(c))).unwrap_or_default()
    };
    let gender = customer.map(|c| c.gender.as_str());
    let selected = |option: &str| {
        if gender == Some(option) {
            " selected"
        } else {
            ""
        }
    };

    let body = format!(
        r#"<h1>{heading}</h1>
<p id="error"></p>
<form method="post" action="{action}">
<label>First name <input type="text" name="FirstName" value="{first_name}" required maxlength="100"></label><br>
<label>Last name <input type="text" name="LastName" value="{last_name}" required maxlength="100"></label><br>
<label>Birth date <input type="date" name="BirthDate" value="{birth_date}" required></label><br>
<label>Gender <select name="Gender"><option value="Male"{male}>Male</option><option value="Female"{female}>Female</option></select></label><br>
<label>Email <input type="email" name="Email" value="{email}" required maxlength="100"></label><br>
<label>Address <textarea name="Address" maxlength="200">{address}</textarea></label><br>
<button type="submit">Save</button> <a href="/">Cancel</a>
</form>
{script}"#,
        heading = escape(heading),
        action = escape(action),
        first_name = value(|c| c.first_name.clone()),
        last_name = value(|c| c.last_name.clone()),
        birth_date = value(|c| c.birth_date.format(DATE_FORMAT).to_string()),
        male = selected("Male"),
        female = selected("Female"),
        email = value(|c| c.email.clone()),
        address = value(|c| c.address.clone()),
        script = SUBMIT_SCRIPT,
    );

    page(heading, &body)
}

pub fn create_form() -> String {
    customer_form("/create", "New customer", None)
}

pub fn edit_form(customer: &Customer) -> String {
    customer_form(
        &format!("/edit/{}", customer.id),
        "Edit customer",
        Some(customer),
    )
}
