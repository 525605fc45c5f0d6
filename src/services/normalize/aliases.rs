//! Ordered alias tables, one per canonical field. Earlier entries win.

pub mod booking {
    pub const ID: &[&str] = &["id", "Id", "bookingId", "BookingId"];
    pub const STATUS: &[&str] = &[
        "statusCode",
        "StatusCode",
        "bookingStatus",
        "BookingStatus",
        "status",
        "Status",
        "statusName",
        "StatusName",
    ];
    pub const STATUS_LABEL: &[&str] = &["statusLabel"];
    pub const UI_STAGE: &[&str] = &["uiStage"];

    pub const VEHICLE_NAME: &[&str] = &[
        "vehicleTitle",
        "carName",
        "vehicleName",
        "car.name",
        "car.Name",
        "vehicle.name",
        "vehicle.Name",
    ];
    pub const VEHICLE_BRAND: &[&str] = &[
        "car.brand",
        "car.Brand",
        "vehicle.brand",
        "vehicle.Brand",
        "carBrand",
        "CarBrand",
    ];
    pub const VEHICLE_MODEL: &[&str] = &[
        "car.model",
        "car.Model",
        "vehicle.model",
        "vehicle.Model",
        "carModel",
        "CarModel",
    ];
    pub const CAR_INFO: &[&str] = &["carInfo", "CarInfo"];
    pub const CAR_ID: &[&str] = &[
        "carId",
        "CarId",
        "vehicleId",
        "VehicleId",
        "car.id",
        "car.Id",
        "vehicle.id",
        "vehicle.Id",
    ];
    pub const VEHICLE_IMAGE: &[&str] = &[
        "vehicleImageUrl",
        "carImageUrl",
        "car.imageUrl",
        "vehicle.imageUrl",
    ];

    pub const FIRST_NAME: &[&str] = &[
        "user.firstName",
        "customer.firstName",
        "firstName",
        "FirstName",
        "user.FirstName",
        "customer.FirstName",
    ];
    pub const LAST_NAME: &[&str] = &[
        "user.lastName",
        "customer.lastName",
        "lastName",
        "LastName",
        "user.LastName",
        "customer.LastName",
    ];
    pub const FULL_NAME: &[&str] = &[
        "fullName",
        "userFullName",
        "customerName",
        "user.fullName",
        "customer.name",
        "user.name",
    ];
    pub const USER_NAME: &[&str] = &[
        "user.userName",
        "user.UserName",
        "user.username",
        "userName",
        "UserName",
        "username",
    ];
    pub const USER_ID: &[&str] = &[
        "userId",
        "UserId",
        "user.id",
        "user.Id",
        "customerId",
        "CustomerId",
        "appUserId",
        "AppUserId",
        "accountId",
        "AccountId",
        "UserID",
        "ownerId",
        "OwnerId",
        "createdById",
        "CreatedById",
    ];
    pub const EMAIL: &[&str] = &["user.email", "customerEmail", "email", "userEmail"];
    pub const ADDRESS: &[&str] = &["user.address", "customerAddress", "address"];
    pub const PHONE: &[&str] = &["phone", "customerPhone", "user.phoneNumber", "phoneNumber"];

    pub const PICKUP_AT: &[&str] = &[
        "pickupAt",
        "startTime",
        "StartTime",
        "pickupDateTime",
        "PickupDateTime",
        "date",
        "bookingDate",
    ];
    pub const RETURN_AT: &[&str] = &[
        "returnAt",
        "endTime",
        "EndTime",
        "expectedReturnDateTime",
        "ExpectedReturnDateTime",
    ];
    pub const CREATED_AT: &[&str] = &["createdAt", "CreatedAt", "bookingDate"];

    /// Any of these naming the station puts the booking in that station's scope.
    pub const STATION_REFS: &[&str] = &[
        "stationId",
        "StationId",
        "station.id",
        "station.Id",
        "pickupStationId",
        "PickupStationId",
        "pickUpStationId",
        "PickUpStationId",
        "startStationId",
        "StartStationId",
        "originStationId",
        "OriginStationId",
        "fromStationId",
        "FromStationId",
        "car.stationId",
        "car.StationId",
        "car.currentStationId",
        "vehicle.stationId",
        "vehicle.StationId",
    ];

    pub const CCCD_FRONT: &[&str] = &[
        "cccdFrontUrl",
        "identityFrontUrl",
        "idFrontUrl",
        "frontImageUrl",
        "frontIdUrl",
        "cccdFrontImageUrl",
        "customer.cccdFrontUrl",
        "user.cccdFrontUrl",
    ];
    pub const CCCD_BACK: &[&str] = &[
        "cccdBackUrl",
        "identityBackUrl",
        "idBackUrl",
        "backImageUrl",
        "backIdUrl",
        "cccdBackImageUrl",
        "customer.cccdBackUrl",
        "user.cccdBackUrl",
    ];
    pub const GPLX_FRONT: &[&str] = &[
        "gplxFrontUrl",
        "driverLicenseFrontUrl",
        "gplxImageUrl_Front",
        "customer.gplxImageUrl_Front",
        "user.gplxImageUrl_Front",
    ];
    pub const GPLX_BACK: &[&str] = &[
        "gplxBackUrl",
        "driverLicenseBackUrl",
        "gplxImageUrl_Back",
        "customer.gplxImageUrl_Back",
        "user.gplxImageUrl_Back",
    ];
    pub const ID_NUMBER: &[&str] = &["idNumber", "customerIdNumber", "user.identityNumber"];
}

pub mod vehicle {
    pub const ID: &[&str] = &["id", "Id", "carId", "CarId"];
    pub const NAME: &[&str] = &["name", "Name", "CarName"];
    pub const MODEL: &[&str] = &["model", "Model"];
    pub const BRAND: &[&str] = &["brand", "Brand"];
    pub const LICENSE_PLATE: &[&str] = &["licensePlate", "LicensePlate"];
    pub const BATTERY: &[&str] = &[
        "batteryPercent",
        "currentBatteryLevel",
        "CurrentBatteryLevel",
        "battery",
    ];
    pub const CAPACITY: &[&str] = &[
        "capacity",
        "batteryCapacity",
        "BatteryCapacity",
        "capacityKWh",
        "batteryCapacityKWh",
    ];
    pub const CONDITION: &[&str] = &["condition", "Condition", "status", "Status"];
    pub const ISSUE: &[&str] = &["issueDescription", "issue", "IssueDescription"];
    pub const IMAGE: &[&str] = &["imageUrl", "image", "thumbnailUrl"];
    pub const STATION_NAME: &[&str] = &["stationName", "station.name", "station.Name"];

    /// Station reference spellings seen across fleet endpoints.
    pub const STATION_REFS: &[&str] = &[
        "currentStationId",
        "CurrentStationId",
        "currentStationID",
        "stationId",
        "StationId",
        "stationID",
        "station.id",
        "station.Id",
        "station.stationId",
        "station.StationId",
    ];
}

pub mod station {
    pub const ID: &[&str] = &["id", "Id", "stationId", "StationId"];
    pub const NAME: &[&str] = &["name", "Name", "stationName", "StationName"];
    pub const ADDRESS: &[&str] = &["address", "Address", "location", "Location"];
    pub const TOTAL_SLOTS: &[&str] = &[
        "totalSlots",
        "TotalSlots",
        "slots",
        "Slots",
        "capacity",
        "Capacity",
    ];
    pub const CARS_COUNT: &[&str] = &["carsCount"];
}

pub mod user {
    pub const ID: &[&str] = &["id", "Id", "userId", "UserId"];
    pub const FIRST_NAME: &[&str] = &["firstName", "FirstName", "givenName", "GivenName"];
    pub const LAST_NAME: &[&str] = &["lastName", "LastName", "surname", "Surname"];
    pub const FULL_NAME: &[&str] = &["fullName", "FullName"];
    pub const USER_NAME: &[&str] = &["userName", "UserName", "username", "user_name"];
    pub const EMAIL: &[&str] = &["email", "Email"];
    pub const ADDRESS: &[&str] = &["address", "Address"];
    pub const PHONE: &[&str] = &["phone", "phoneNumber", "PhoneNumber"];
    pub const ROLE: &[&str] = &[
        "role",
        "Role",
        "roleName",
        "RoleName",
        "userRole",
        "UserRole",
    ];
    pub const STATION_ID: &[&str] = &["stationId", "StationId"];
}
