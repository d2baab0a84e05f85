mod common;

use std::fs;
use std::path::Path;

use common::{shop, FakeSchema};
use crudkit_codegen::{
    ArtifactKind, CodegenError, CrudGenerator, GenerateOptions, StubLoader, ViewStack, WriteOutcome,
};
use crudkit_core::{CoreError, CrudConfig};

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap()
}

#[tokio::test]
async fn test_generates_web_crud() {
    let dir = tempfile::tempdir().unwrap();
    let schema = shop();
    let config = CrudConfig::default();
    let generator = CrudGenerator::new(&schema, &config, dir.path());

    let report = generator.generate("orders", &GenerateOptions::default()).await.unwrap();

    assert_eq!(report.model_name, "Order");
    assert_eq!(report.relations.len(), 1);
    assert_eq!(report.files.len(), 8);
    assert!(report.files.iter().all(|file| file.outcome.is_change()));

    let model = read(dir.path(), "app/Models/Order.php");
    assert!(model.contains("namespace App\\Models;"));
    assert!(model.contains("class Order extends Model"));
    assert!(model.contains("protected $table = 'orders';"));
    assert!(model.contains(
        " * @property $deleted_at\n *\n * @property Customer $customer\n * @package"
    ));
    assert!(model.contains(
        "return $this->belongsTo('App\\Models\\Customer', 'customer_id', 'id');"
    ));
    assert!(model.contains("'customer_id' => 'required',"));
    assert!(model.contains("use Illuminate\\Database\\Eloquent\\SoftDeletes;"));
    assert!(!model.contains("{{"));

    let controller = read(dir.path(), "app/Http/Controllers/OrderController.php");
    assert!(controller.contains("class OrderController extends Controller"));
    assert!(controller.contains("return view('order.index', compact('orders'))"));

    for view in ["index", "create", "edit", "form", "show"] {
        assert!(dir.path().join(format!("resources/views/order/{}.blade.php", view)).exists());
    }
    let index = read(dir.path(), "resources/views/order/index.blade.php");
    assert!(index.contains("<th>Customer Id</th>"));
    assert!(index.contains("<td>{{ $order->total }}</td>"));
    assert!(!index.contains("<th>Id</th>"));

    let form = read(dir.path(), "resources/views/order/form.blade.php");
    assert!(form.contains("name=\"customer_id\""));

    let routes = read(dir.path(), "routes/web.php");
    assert!(routes.starts_with("<?php"));
    assert!(routes
        .contains("Route::resource('orders', App\\Http\\Controllers\\OrderController::class);"));

    assert!(!dir.path().join("routes/api.php").exists());
}

#[tokio::test]
async fn test_existing_classes_are_kept_unless_forced() {
    let dir = tempfile::tempdir().unwrap();
    let schema = shop();
    let config = CrudConfig::default();
    let generator = CrudGenerator::new(&schema, &config, dir.path());

    let model_path = dir.path().join("app/Models/Customer.php");
    fs::create_dir_all(model_path.parent().unwrap()).unwrap();
    fs::write(&model_path, "<?php // hand written").unwrap();

    let report = generator.generate("customers", &GenerateOptions::default()).await.unwrap();
    let model = report.files.iter().find(|f| f.kind == ArtifactKind::Model).unwrap();
    assert_eq!(model.outcome, WriteOutcome::Skipped);
    assert_eq!(fs::read_to_string(&model_path).unwrap(), "<?php // hand written");

    let forced = GenerateOptions {
        force: true,
        ..GenerateOptions::default()
    };
    let report = generator.generate("customers", &forced).await.unwrap();
    let model = report.files.iter().find(|f| f.kind == ArtifactKind::Model).unwrap();
    assert_eq!(model.outcome, WriteOutcome::Updated);
    let content = fs::read_to_string(&model_path).unwrap();
    assert!(content.contains("@property Order[] $orders"));
    assert!(content.contains("@property Profile $profile"));
}

#[tokio::test]
async fn test_second_run_does_not_duplicate_routes() {
    let dir = tempfile::tempdir().unwrap();
    let schema = shop();
    let config = CrudConfig::default();
    let generator = CrudGenerator::new(&schema, &config, dir.path());
    let options = GenerateOptions {
        api: true,
        ..GenerateOptions::default()
    };

    generator.generate("customers", &options).await.unwrap();
    let report = generator.generate("customers", &options).await.unwrap();

    let routes = read(dir.path(), "routes/web.php");
    assert_eq!(routes.matches("Route::resource('customers'").count(), 1);
    let api_routes = read(dir.path(), "routes/api.php");
    assert_eq!(api_routes.matches("Route::apiResource('customers'").count(), 1);

    for file in &report.files {
        let expected = match file.kind {
            ArtifactKind::WebRoutes | ArtifactKind::ApiRoutes => WriteOutcome::AlreadyPresent,
            ArtifactKind::View => WriteOutcome::Unchanged,
            _ => WriteOutcome::Skipped,
        };
        assert_eq!(file.outcome, expected, "{}", file.path.display());
    }
}

#[tokio::test]
async fn test_api_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let schema = shop();
    let config = CrudConfig::default();
    let generator = CrudGenerator::new(&schema, &config, dir.path());
    let options = GenerateOptions {
        api: true,
        route: Some("clients".to_string()),
        ..GenerateOptions::default()
    };

    let report = generator.generate("customers", &options).await.unwrap();
    assert_eq!(report.files.len(), 12);

    let controller = read(dir.path(), "app/Http/Controllers/Api/CustomerController.php");
    assert!(controller.contains("namespace App\\Http\\Controllers\\Api;"));
    assert!(controller.contains("return CustomerResource::collection($customers);"));

    let resource = read(dir.path(), "app/Http/Resources/CustomerResource.php");
    assert!(resource.contains("class CustomerResource extends JsonResource"));

    let request = read(dir.path(), "app/Http/Requests/CustomerRequest.php");
    assert!(request.contains("'name' => 'required',"));
    assert!(!request.contains("'email' => 'required',"));

    let api_routes = read(dir.path(), "routes/api.php");
    assert!(api_routes.contains(
        "Route::apiResource('clients', App\\Http\\Controllers\\Api\\CustomerController::class);"
    ));
}

#[tokio::test]
async fn test_missing_table_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let schema = shop();
    let config = CrudConfig::default();
    let generator = CrudGenerator::new(&schema, &config, dir.path());

    let err = generator.generate("invoices", &GenerateOptions::default()).await.unwrap_err();
    assert!(matches!(err, CodegenError::TableNotFound { ref table } if table == "invoices"));

    let err = generator.generate("  ", &GenerateOptions::default()).await.unwrap_err();
    assert!(matches!(err, CodegenError::Core(CoreError::Validation { .. })));

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_schema_failure_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let schema = FakeSchema::new()
        .table("customers", Vec::new())
        .relation(
            "customers",
            crudkit_introspect::ForeignKeyRelation::incoming("orders", "customer_id", "id"),
        )
        .failing_keys("orders");
    let config = CrudConfig::default();
    let generator = CrudGenerator::new(&schema, &config, dir.path());

    let err = generator.generate("customers", &GenerateOptions::default()).await.unwrap_err();
    assert!(matches!(err, CodegenError::Schema(_)));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_custom_stub_directory() {
    let dir = tempfile::tempdir().unwrap();
    let stubs = tempfile::tempdir().unwrap();
    fs::write(stubs.path().join("Controller.stub"), "custom {{modelName}}").unwrap();

    let schema = shop();
    let config = CrudConfig::default();
    let generator = CrudGenerator::new(&schema, &config, dir.path())
        .with_stubs(StubLoader::from_dir(stubs.path()));

    let err = generator.generate("orders", &GenerateOptions::default()).await.unwrap_err();
    assert!(matches!(err, CodegenError::Template { .. }));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_plan_renders_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let schema = shop();
    let config = CrudConfig::default();
    let generator = CrudGenerator::new(&schema, &config, dir.path());

    let plan = generator.plan("profiles", &GenerateOptions::default()).await.unwrap();

    assert_eq!(plan.model_name, "Profile");
    assert_eq!(plan.artifacts.len(), 8);
    assert_eq!(plan.relations.fragments[0].accessor_name, "customer");
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_tailwind_stack_views() {
    let dir = tempfile::tempdir().unwrap();
    let schema = shop();
    let config = CrudConfig::default();
    let generator = CrudGenerator::new(&schema, &config, dir.path());
    let options = GenerateOptions {
        stack: Some(ViewStack::BladeTailwind),
        ..GenerateOptions::default()
    };

    generator.generate("orders", &options).await.unwrap();

    let index = read(dir.path(), "resources/views/order/index.blade.php");
    assert!(index.contains("divide-gray-300"));
    assert!(index.contains("<th>Customer Id</th>"));
    assert!(!index.contains("{{tableHeader}}"));
    let form = read(dir.path(), "resources/views/order/form.blade.php");
    assert!(form.contains("name=\"customer_id\""));
}

#[tokio::test]
async fn test_stack_stubs_from_directory() {
    let dir = tempfile::tempdir().unwrap();
    let schema = shop();
    let config = CrudConfig::default();
    let options = GenerateOptions {
        stack: Some(ViewStack::VueBootstrap),
        ..GenerateOptions::default()
    };

    // No built-in vue stubs
    let generator = CrudGenerator::new(&schema, &config, dir.path());
    let err = generator.plan("orders", &options).await.unwrap_err();
    assert!(matches!(
        err,
        CodegenError::Template { ref message } if message.contains("views/vue-bootstrap/index")
    ));

    let stubs = tempfile::tempdir().unwrap();
    let views = stubs.path().join("views");
    fs::create_dir_all(views.join("vue-bootstrap")).unwrap();
    for (name, content) in [
        ("Controller", "{{modelName}}Controller"),
        ("Model", "{{modelName}}"),
        ("routes", "Route::resource('{{modelRoute}}');"),
    ] {
        fs::write(stubs.path().join(format!("{}.stub", name)), content).unwrap();
    }
    for field in ["form-field", "view-field"] {
        fs::write(views.join(format!("{}.stub", field)), "{{column}};").unwrap();
    }
    for view in ["index", "create", "edit", "form", "show"] {
        let stub = views.join("vue-bootstrap").join(format!("{}.stub", view));
        fs::write(stub, format!("vue {} {{{{form}}}}", view)).unwrap();
    }

    let generator = generator.with_stubs(StubLoader::from_dir(stubs.path()));
    generator.generate("orders", &options).await.unwrap();

    let form = read(dir.path(), "resources/views/order/form.blade.php");
    assert!(form.starts_with("vue form \ncustomer_id;"));
}

#[tokio::test]
async fn test_service_generation() {
    let dir = tempfile::tempdir().unwrap();
    let schema = shop();
    let config = CrudConfig::default();
    let generator = CrudGenerator::new(&schema, &config, dir.path());

    let file = generator.generate_service("orders", None).await.unwrap();
    assert_eq!(file.kind, ArtifactKind::Service);
    assert_eq!(file.outcome, WriteOutcome::Created);

    let service = read(dir.path(), "app/Services/OrderService.php");
    assert!(service.contains("namespace App\\Services;"));
    assert!(service.contains("use App\\Models\\Order;"));
    assert!(service.contains("class OrderService"));
    assert!(service.contains("public function update(Order $order, array $data): Order"));
    assert!(!service.contains("{{"));

    generator.generate_service("customers", Some("billing-desk")).await.unwrap();
    let service = read(dir.path(), "app/Services/BillingDesk/BillingDeskService.php");
    assert!(service.contains("namespace App\\Services\\BillingDesk;"));
    assert!(service.contains("class BillingDeskService"));
    assert!(service.contains("return Customer::paginate($perPage);"));
}

#[tokio::test]
async fn test_service_is_never_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let schema = shop();
    let config = CrudConfig::default();
    let generator = CrudGenerator::new(&schema, &config, dir.path());

    let path = dir.path().join("app/Services/OrderService.php");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "<?php // hand written").unwrap();

    let err = generator.generate_service("orders", None).await.unwrap_err();
    assert!(matches!(err, CodegenError::AlreadyExists { path: ref existing } if existing == &path));
    assert_eq!(fs::read_to_string(&path).unwrap(), "<?php // hand written");
}

#[tokio::test]
async fn test_service_rejects_bad_input() {
    let dir = tempfile::tempdir().unwrap();
    let schema = shop();
    let config = CrudConfig::default();
    let generator = CrudGenerator::new(&schema, &config, dir.path());

    let err = generator.generate_service("invoices", None).await.unwrap_err();
    assert!(matches!(err, CodegenError::TableNotFound { .. }));

    let err = generator.generate_service("orders", Some("two-dash-folder")).await.unwrap_err();
    assert!(matches!(err, CodegenError::Core(CoreError::Validation { .. })));

    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
