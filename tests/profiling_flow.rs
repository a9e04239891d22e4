//! End-to-end exercises of the profiling pipeline: markers attached
//! declaratively, decorators generated by `profile_service!`, installers
//! sweeping a registry, and rendered output checked through a memory sink.

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use callprof::{
    impl_capture_debug, profile_method, profile_service, profile_type, AdvisorInstaller, CallSite,
    Capture, CapturedValue, EffectiveMarker, Install, Interceptor, LegacyInstaller, LogStyle,
    Marker, MarkerScope, MemorySink, ProfileRecord, ProfilingConfig, ServiceRegistry,
};

#[derive(Debug, Clone, PartialEq)]
struct User {
    id: i64,
    name: String,
}

impl_capture_debug!(User);

#[derive(Debug)]
struct ServiceError(String);

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

trait UserApi {
    fn find_user(&self, id: i64) -> User;
    fn change_password(&self, id: i64, new_password: String) -> bool;
    fn delete_user(&self, id: i64) -> Result<(), ServiceError>;
}

struct UserService {
    calls: Arc<AtomicUsize>,
}

impl UserApi for UserService {
    fn find_user(&self, id: i64) -> User {
        self.calls.fetch_add(1, Ordering::SeqCst);
        User {
            id,
            name: "Ada".to_string(),
        }
    }

    fn change_password(&self, _id: i64, new_password: String) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        !new_password.is_empty()
    }

    fn delete_user(&self, id: i64) -> Result<(), ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if id < 0 {
            return Err(ServiceError("User ID cannot be negative".to_string()));
        }
        Ok(())
    }
}

profile_type!(UserService);
// Password changes must never log their arguments.
profile_method!(
    UserService,
    change_password,
    Marker::new().message("password change").log_params(false)
);

profile_service! {
    struct UserServiceDecorator wraps UserService as UserApi {
        fn find_user(&self, id: i64) -> User;
        fn change_password(&self, id: i64, new_password: String) -> bool;
        #[fallible]
        fn delete_user(&self, id: i64) -> Result<(), ServiceError>;
    }
}

trait NotifyApi {
    fn notify(&self, user_id: i64);
}

struct NotifyService;

impl NotifyApi for NotifyService {
    fn notify(&self, _user_id: i64) {}
}

profile_type!(
    NotifyService,
    Marker::new()
        .message("notification sent")
        .log_result(false)
        .log_params(false)
        .log_time(false)
        .log_caller_info(false)
);

profile_service! {
    struct NotifyServiceDecorator wraps NotifyService as NotifyApi {
        fn notify(&self, user_id: i64);
    }
}

trait PaymentApi {
    fn process_payment(&self, amount: f64) -> bool;
}

struct PaymentService;

impl PaymentApi for PaymentService {
    fn process_payment(&self, amount: f64) -> bool {
        amount > 0.0
    }
}

profile_type!(PaymentService, Marker::new().message("payment"));

profile_service! {
    struct PaymentServiceDecorator wraps PaymentService as PaymentApi {
        fn process_payment(&self, amount: f64) -> bool;
    }
}

trait OrderApi {
    fn create_order(&self, user_id: i64, amount: f64) -> String;
}

struct OrderService {
    users: Box<dyn UserApi>,
    payments: Box<dyn PaymentApi>,
}

impl OrderApi for OrderService {
    fn create_order(&self, user_id: i64, amount: f64) -> String {
        let user = self.users.find_user(user_id);
        let paid = self.payments.process_payment(amount);
        format!("order for {} (paid: {paid})", user.name)
    }
}

profile_type!(OrderService);

profile_service! {
    struct OrderServiceDecorator wraps OrderService as OrderApi {
        fn create_order(&self, user_id: i64, amount: f64) -> String;
    }
}

struct Blob {
    bytes: Vec<u8>,
}

// Simulates a domain type whose rendering is broken.
impl fmt::Debug for Blob {
    fn fmt(&self, _f: &mut fmt::Formatter) -> fmt::Result {
        panic!("blob of {} bytes refuses to render", self.bytes.len())
    }
}

impl_capture_debug!(Blob);

trait IngestApi {
    fn ingest(&self, blob: Blob) -> usize;
}

struct IngestService {
    calls: Arc<AtomicUsize>,
}

impl IngestApi for IngestService {
    fn ingest(&self, blob: Blob) -> usize {
        self.calls.fetch_add(1, Ordering::SeqCst);
        blob.bytes.len()
    }
}

profile_type!(IngestService);

profile_service! {
    struct IngestServiceDecorator wraps IngestService as IngestApi {
        fn ingest(&self, blob: Blob) -> usize;
    }
}

trait GhostApi {
    fn haunt(&self) -> u32;
}

struct GhostService;

impl GhostApi for GhostService {
    fn haunt(&self) -> u32 {
        13
    }
}

profile_service! {
    struct GhostServiceDecorator wraps GhostService as GhostApi {
        fn haunt(&self) -> u32;
    }
}

fn decorated_user_service(
    calls: &Arc<AtomicUsize>,
    sink: &Arc<MemorySink>,
    style: LogStyle,
) -> UserServiceDecorator {
    let service = UserService {
        calls: Arc::clone(calls),
    };
    let interceptor = Interceptor::new(std::any::type_name::<UserService>(), style)
        .with_sink(Arc::clone(sink) as _);
    UserServiceDecorator::new(service, interceptor)
}

#[test]
fn simple_layout_records_a_successful_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let sink = Arc::new(MemorySink::new());
    let service = decorated_user_service(&calls, &sink, LogStyle::Simple);

    let user = service.find_user(123);

    assert_eq!(user.id, 123);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let messages = sink.messages();
    assert_eq!(messages.len(), 1);
    let out = &messages[0];
    assert!(out.contains("| Profiling info:  |"));
    assert!(out.contains("::UserService::find_user"));
    assert!(out.contains("| CallerInfo: "));
    assert!(out.contains("| Params: "));
    assert!(out.contains("| [0] i64 = 123"));
    assert!(out.contains("| Result: User { id: 123, name: \"Ada\" }"));
    assert!(out.contains("| Time: "));
}

#[test]
fn method_marker_overrides_the_type_marker() {
    let calls = Arc::new(AtomicUsize::new(0));
    let sink = Arc::new(MemorySink::new());
    let service = decorated_user_service(&calls, &sink, LogStyle::Simple);

    assert!(service.change_password(123, "hunter2".to_string()));

    let messages = sink.messages();
    assert_eq!(messages.len(), 1);
    let out = &messages[0];
    assert!(out.contains("| password change"));
    // The method marker mutes parameters; the secret never reaches the log.
    assert!(!out.contains("Params:"));
    assert!(!out.contains("hunter2"));
    assert!(out.contains("| Result: true"));
}

#[test]
fn fallible_errors_are_logged_and_returned_unchanged() {
    let calls = Arc::new(AtomicUsize::new(0));
    let sink = Arc::new(MemorySink::new());
    let service = decorated_user_service(&calls, &sink, LogStyle::Simple);

    let outcome = service.delete_user(-5);

    let error = outcome.unwrap_err();
    assert_eq!(error.0, "User ID cannot be negative");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let messages = sink.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("| Error: ServiceError: User ID cannot be negative"));
    assert!(!messages[0].contains("Result:"));
}

#[test]
fn muted_marker_emits_only_the_notice() {
    let sink = Arc::new(MemorySink::new());
    let interceptor = Interceptor::new(std::any::type_name::<NotifyService>(), LogStyle::Simple)
        .with_sink(Arc::clone(&sink) as _);
    let service = NotifyServiceDecorator::new(NotifyService, interceptor);

    service.notify(7);

    assert_eq!(
        sink.messages(),
        vec!["Profiling method intercepted with message: notification sent"]
    );
}

#[test]
fn unmarked_services_are_never_logged() {
    let sink = Arc::new(MemorySink::new());
    let interceptor = Interceptor::new(std::any::type_name::<GhostService>(), LogStyle::Simple)
        .with_sink(Arc::clone(&sink) as _);
    let service = GhostServiceDecorator::new(GhostService, interceptor);

    assert_eq!(service.haunt(), 13);
    assert!(sink.messages().is_empty());
}

#[test]
fn prettier_layout_widens_to_fit_a_long_method_name() {
    let record = ProfileRecord {
        method_qualified: "m".repeat(95),
        arguments: Vec::new(),
        result: Some(CapturedValue::other("true")),
        thrown: None,
        elapsed_nanos: 1_500_000,
        caller: CallSite::unknown(),
        style: LogStyle::Prettier,
        marker: EffectiveMarker {
            marker: Marker::new(),
            scope: MarkerScope::Type,
        },
    };

    let out = callprof::render(&record);
    let lines: Vec<&str> = out.trim_start_matches('\n').lines().collect();
    assert!(lines.len() > 2);
    for line in &lines {
        assert_eq!(line.chars().count(), 107, "ragged line: {line:?}");
    }
    assert!(out.contains(" PROFILING INFO "));
    assert!(out.contains("| Status:  SUCCESS"));
}

#[test]
fn installer_swaps_marked_services_in_place() {
    let calls = Arc::new(AtomicUsize::new(0));
    let sink = Arc::new(MemorySink::new());

    let mut registry = ServiceRegistry::new();
    registry.register(
        "userService",
        UserService {
            calls: Arc::clone(&calls),
        },
    );
    registry.register("ghostService", GhostService);

    AdvisorInstaller::new(ProfilingConfig::default())
        .with_sink(Arc::clone(&sink) as _)
        .install(&mut registry);

    assert!(registry.is_decorated("userService"));
    assert!(!registry.is_decorated("ghostService"));

    let decorated = registry
        .get::<UserServiceDecorator>("userService")
        .expect("decorated service");
    let user = decorated.find_user(9);
    assert_eq!(user.id, 9);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(sink.messages().len(), 1);
}

#[test]
fn disabled_configuration_installs_nothing() {
    let mut registry = ServiceRegistry::new();
    registry.register(
        "userService",
        UserService {
            calls: Arc::new(AtomicUsize::new(0)),
        },
    );

    let config = ProfilingConfig {
        enabled: false,
        ..ProfilingConfig::default()
    };
    AdvisorInstaller::new(config).install(&mut registry);

    assert!(!registry.is_decorated("userService"));
    assert!(registry.get::<UserService>("userService").is_some());
}

#[test]
fn legacy_installer_matches_the_advisor() {
    let calls = Arc::new(AtomicUsize::new(0));
    let sink = Arc::new(MemorySink::new());

    let mut registry = ServiceRegistry::new();
    registry.register(
        "userService",
        UserService {
            calls: Arc::clone(&calls),
        },
    );
    registry.register("ghostService", GhostService);

    LegacyInstaller::new(ProfilingConfig::default())
        .with_sink(Arc::clone(&sink) as _)
        .install(&mut registry);

    assert!(registry.is_decorated("userService"));
    assert!(!registry.is_decorated("ghostService"));

    let decorated = registry
        .get::<UserServiceDecorator>("userService")
        .expect("decorated service");
    decorated.delete_user(4).expect("deletion succeeds");
    assert!(sink.messages()[0].contains("delete_user"));
}

#[test]
fn unprintable_arguments_never_break_the_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let sink = Arc::new(MemorySink::new());
    let service = IngestServiceDecorator::new(
        IngestService {
            calls: Arc::clone(&calls),
        },
        Interceptor::new(std::any::type_name::<IngestService>(), LogStyle::Simple)
            .with_sink(Arc::clone(&sink) as _),
    );

    let size = service.ingest(Blob {
        bytes: vec![1, 2, 3],
    });

    // The broken Debug impl must not stop delegation or reach the caller.
    assert_eq!(size, 3);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    let messages = sink.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].contains("::IngestService::ingest"));
    // The argument is logged in its opaque type-at-address form.
    assert!(messages[0].contains("| [0] profiling_flow::Blob = Blob@"));
    assert!(messages[0].contains("| Result: 3"));
}

#[test]
fn nested_calls_log_inner_records_first() {
    let calls = Arc::new(AtomicUsize::new(0));
    let sink = Arc::new(MemorySink::new());

    let users = Box::new(decorated_user_service(&calls, &sink, LogStyle::Simple));
    let payments = Box::new(PaymentServiceDecorator::new(
        PaymentService,
        Interceptor::new(std::any::type_name::<PaymentService>(), LogStyle::Simple)
            .with_sink(Arc::clone(&sink) as _),
    ));
    let orders = OrderServiceDecorator::new(
        OrderService { users, payments },
        Interceptor::new(std::any::type_name::<OrderService>(), LogStyle::Simple)
            .with_sink(Arc::clone(&sink) as _),
    );

    let summary = orders.create_order(123, 19.99);

    assert_eq!(summary, "order for Ada (paid: true)");
    let messages = sink.messages();
    assert_eq!(messages.len(), 3);
    // Inner invocations finish (and log) before the outer one.
    assert!(messages[0].contains("::UserService::find_user"));
    assert!(messages[1].contains("::PaymentService::process_payment"));
    assert!(messages[2].contains("::OrderService::create_order"));
    assert!(messages[2].contains("| Result: order for Ada (paid: true)"));
}

#[derive(Debug)]
struct Coupon {
    code: &'static str,
}

impl_capture_debug!(Coupon);

#[test]
fn custom_value_formatters_apply_to_captures() {
    callprof::add_value_formatter(|value| {
        value
            .downcast_ref::<Coupon>()
            .map(|coupon| format!("Coupon({})", coupon.code))
    });

    let captured = Coupon { code: "SAVE10" }.capture();
    assert_eq!(callprof::render::pretty(&captured), "Coupon(SAVE10)");
}
