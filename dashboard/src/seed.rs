//! Canned records shared by the initial state and the mock data service.

use crate::types::{
    Alert, AlertKind, DashboardData, ForecastPoint, InventorySlice, Kpis, Order, OrderStatus,
    Priority, ProcurementOrder, Product, StockStatus, Supplier, SupplierStatus, Trend,
};

/// KPI values before any perturbation
#[must_use]
pub fn kpi_baseline() -> Kpis {
    Kpis {
        forecast_accuracy: 94.7,
        cost_savings: 2_400_000,
        disruptions_prevented: 47,
        inventory_turnover: 8.2,
        avg_delivery_time: 3.2,
        stockout_rate: 2.1,
    }
}

/// Dashboard page with baseline KPIs
#[must_use]
pub fn dashboard() -> DashboardData {
    DashboardData {
        kpis: kpi_baseline(),
        demand_forecast: demand_forecast(),
        inventory: inventory(),
        alerts: alerts(),
        top_products: top_products(),
    }
}

fn week(date: &str, actual: Option<u32>, predicted: u32, confidence: u8) -> ForecastPoint {
    ForecastPoint {
        date: date.to_string(),
        actual,
        predicted,
        confidence,
    }
}

fn demand_forecast() -> Vec<ForecastPoint> {
    vec![
        week("Jan 15", Some(2400), 2380, 95),
        week("Jan 22", Some(1398), 1420, 93),
        week("Jan 29", Some(9800), 9750, 96),
        week("Feb 5", Some(3908), 3890, 94),
        week("Feb 12", Some(4800), 4850, 92),
        week("Feb 19", Some(3800), 3820, 95),
        week("Feb 26", None, 4300, 91),
    ]
}

fn inventory() -> Vec<InventorySlice> {
    [
        ("Raw Materials", 35, StockStatus::Optimal),
        ("Work in Progress", 25, StockStatus::Warning),
        ("Finished Goods", 30, StockStatus::Optimal),
        ("Packaging", 10, StockStatus::Critical),
    ]
    .into_iter()
    .map(|(category, value, status)| InventorySlice {
        category: category.to_string(),
        value,
        status,
    })
    .collect()
}

fn alerts() -> Vec<Alert> {
    [
        (AlertKind::Critical, "Monsoon delays expected in Mumbai port", "2 hours ago", "AlertTriangle"),
        (AlertKind::Warning, "Supplier XYZ delivery delayed by 2 days", "4 hours ago", "Truck"),
        (AlertKind::Info, "Inventory reorder point reached for SKU-12345", "6 hours ago", "Package"),
        (AlertKind::Success, "Route optimization saved ₹45,000 this week", "1 day ago", "TrendingUp"),
        (AlertKind::Warning, "Festival demand spike predicted in 7 days", "1 day ago", "Calendar"),
    ]
    .into_iter()
    .zip(1..)
    .map(|((kind, message, time, icon), id)| Alert {
        id,
        kind,
        message: message.to_string(),
        time: time.to_string(),
        icon: icon.to_string(),
    })
    .collect()
}

fn top_products() -> Vec<Product> {
    [
        ("SKU-12345", "Premium Widget A", 2400, 1800, StockStatus::Low, Trend::Up),
        ("SKU-67890", "Standard Component B", 1800, 3200, StockStatus::Optimal, Trend::Stable),
        ("SKU-45678", "Deluxe Module C", 3200, 2900, StockStatus::Optimal, Trend::Up),
        ("SKU-23456", "Basic Part D", 1500, 400, StockStatus::Critical, Trend::Down),
    ]
    .into_iter()
    .map(|(sku, name, demand, stock, status, trend)| Product {
        sku: sku.to_string(),
        name: name.to_string(),
        demand,
        stock,
        status,
        trend,
    })
    .collect()
}

/// Customer orders `ORD-001` to `ORD-008`
#[must_use]
pub fn orders() -> Vec<Order> {
    use OrderStatus::{Delayed, Delivered, Pending, Processing, Shipped};
    use Priority::{High, Low, Medium};

    [
        ("ORD-001", "ABC Corp", "2023-06-15", 125_000, Delivered, 42, "2023-06-18", High),
        ("ORD-002", "XYZ Ltd", "2023-06-16", 87_500, Shipped, 28, "2023-06-20", Medium),
        ("ORD-003", "Tech Solutions", "2023-06-16", 210_000, Processing, 65, "2023-06-22", High),
        ("ORD-004", "Global Enterprises", "2023-06-17", 95_000, Pending, 32, "2023-06-24", Low),
        ("ORD-005", "Innovative Systems", "2023-06-17", 165_000, Delayed, 51, "2023-06-25", High),
        ("ORD-006", "Future Tech", "2023-06-18", 78_000, Processing, 28, "2023-06-26", Medium),
        ("ORD-007", "Digital Dynamics", "2023-06-18", 142_000, Shipped, 38, "2023-06-27", High),
        ("ORD-008", "Quantum Innovations", "2023-06-19", 98_000, Pending, 29, "2023-06-28", Medium),
    ]
    .into_iter()
    .map(|(id, customer, date, amount, status, items, eta, priority)| Order {
        id: id.to_string(),
        customer: customer.to_string(),
        date: date.to_string(),
        amount,
        status,
        items,
        eta: eta.to_string(),
        priority,
    })
    .collect()
}

struct SupplierRow {
    id: &'static str,
    name: &'static str,
    contact: &'static str,
    email: &'static str,
    phone: &'static str,
    location: &'static str,
    rating: f64,
    status: SupplierStatus,
    products: u32,
    last_order: &'static str,
    performance: u8,
    category: &'static str,
}

const SUPPLIERS: [SupplierRow; 6] = [
    SupplierRow {
        id: "SUP-001",
        name: "Global Components Ltd",
        contact: "John Smith",
        email: "john@globalcomponents.com",
        phone: "+91 98765 43210",
        location: "Mumbai, India",
        rating: 4.8,
        status: SupplierStatus::Active,
        products: 42,
        last_order: "2023-06-15",
        performance: 95,
        category: "Electronics",
    },
    SupplierRow {
        id: "SUP-002",
        name: "Tech Materials Inc",
        contact: "Sarah Johnson",
        email: "sarah@techmaterials.com",
        phone: "+1 555 123 4567",
        location: "San Francisco, USA",
        rating: 4.5,
        status: SupplierStatus::Active,
        products: 28,
        last_order: "2023-06-18",
        performance: 92,
        category: "Materials",
    },
    SupplierRow {
        id: "SUP-003",
        name: "Precision Parts Co",
        contact: "Michael Chen",
        email: "michael@precisionparts.com",
        phone: "+86 138 0013 8000",
        location: "Shanghai, China",
        rating: 4.2,
        status: SupplierStatus::Pending,
        products: 65,
        last_order: "2023-06-10",
        performance: 88,
        category: "Components",
    },
    SupplierRow {
        id: "SUP-004",
        name: "Industrial Solutions",
        contact: "Emma Wilson",
        email: "emma@industrialsolutions.com",
        phone: "+44 20 7123 4567",
        location: "London, UK",
        rating: 4.9,
        status: SupplierStatus::Active,
        products: 32,
        last_order: "2023-06-20",
        performance: 94,
        category: "Machinery",
    },
    SupplierRow {
        id: "SUP-005",
        name: "Advanced Manufacturing",
        contact: "Robert Kim",
        email: "robert@advancedmfg.com",
        phone: "+82 2 1234 5678",
        location: "Seoul, South Korea",
        rating: 3.9,
        status: SupplierStatus::Delayed,
        products: 51,
        last_order: "2023-05-28",
        performance: 85,
        category: "Electronics",
    },
    SupplierRow {
        id: "SUP-006",
        name: "Quality Components",
        contact: "Lisa Anderson",
        email: "lisa@qualitycomponents.com",
        phone: "+61 2 9876 5432",
        location: "Sydney, Australia",
        rating: 4.7,
        status: SupplierStatus::Active,
        products: 24,
        last_order: "2023-06-12",
        performance: 91,
        category: "Components",
    },
];

/// Supplier directory `SUP-001` to `SUP-006`
#[must_use]
pub fn suppliers() -> Vec<Supplier> {
    SUPPLIERS
        .iter()
        .map(|row| Supplier {
            id: row.id.to_string(),
            name: row.name.to_string(),
            contact: row.contact.to_string(),
            email: row.email.to_string(),
            phone: row.phone.to_string(),
            location: row.location.to_string(),
            rating: row.rating,
            status: row.status,
            products: row.products,
            last_order: row.last_order.to_string(),
            performance: row.performance,
            category: row.category.to_string(),
        })
        .collect()
}

/// Purchase orders `PO-001` to `PO-006`
#[must_use]
pub fn procurement() -> Vec<ProcurementOrder> {
    use OrderStatus::{Delayed, Delivered, Pending, Processing, Shipped};

    [
        ("PO-001", "Global Components Ltd", "2023-06-10", 125_000, Delivered, 42),
        ("PO-002", "Tech Materials Inc", "2023-06-12", 87_500, Shipped, 28),
        ("PO-003", "Precision Parts Co", "2023-06-15", 210_000, Processing, 65),
        ("PO-004", "Industrial Solutions", "2023-06-18", 95_000, Pending, 32),
        ("PO-005", "Advanced Manufacturing", "2023-06-20", 165_000, Delayed, 51),
        ("PO-006", "Quality Components", "2023-06-22", 78_000, Processing, 24),
    ]
    .into_iter()
    .map(|(id, supplier, date, amount, status, items)| ProcurementOrder {
        id: id.to_string(),
        supplier: supplier.to_string(),
        date: date.to_string(),
        amount,
        status,
        items,
    })
    .collect()
}
